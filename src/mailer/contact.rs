//! Contact-form submissions and the email they produce

use chrono::{DateTime, Local};
use serde::Deserialize;

/// Raw JSON body of `POST /api/contact`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactSubmission {
    pub nom: Option<String>,
    pub email: Option<String>,
    pub entreprise: Option<String>,
    pub telephone: Option<String>,
    pub budget: Option<String>,
    pub message: Option<String>,
}

/// Why a submission was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactRejection {
    MissingField(&'static str),
    InvalidEmail,
}

impl ContactRejection {
    /// Message returned to the caller
    pub fn message(&self) -> String {
        match self {
            ContactRejection::MissingField(field) => format!("Le champ {} est requis", field),
            ContactRejection::InvalidEmail => "Adresse email invalide".to_string(),
        }
    }
}

/// A submission that passed validation, all fields trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub nom: String,
    pub email: String,
    pub entreprise: String,
    pub telephone: String,
    pub budget: String,
    pub message: String,
}

fn trimmed(value: &Option<String>) -> String {
    value.as_deref().unwrap_or_default().trim().to_string()
}

impl ContactSubmission {
    /// Checks the required fields in order (`nom`, `email`, `message`),
    /// then the email shape
    pub fn validate(&self) -> Result<Contact, ContactRejection> {
        let required = [
            ("nom", &self.nom),
            ("email", &self.email),
            ("message", &self.message),
        ];
        for (field, value) in required {
            if trimmed(value).is_empty() {
                return Err(ContactRejection::MissingField(field));
            }
        }

        let contact = Contact {
            nom: trimmed(&self.nom),
            email: trimmed(&self.email),
            entreprise: trimmed(&self.entreprise),
            telephone: trimmed(&self.telephone),
            budget: trimmed(&self.budget),
            message: trimmed(&self.message),
        };

        if !contact.email.contains('@') || !contact.email.contains('.') {
            return Err(ContactRejection::InvalidEmail);
        }

        Ok(contact)
    }
}

fn or_unspecified<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

/// Subject and plain-text body of the notification email
pub fn render_contact_email(
    contact: &Contact,
    site_name: &str,
    received: &DateTime<Local>,
) -> (String, String) {
    let subject = format!("Nouveau contact {} - {}", site_name, contact.nom);
    let rule = "-".repeat(23);

    let body = format!(
        "Nouveau message de contact depuis le site {site} :\n\
         \n\
         INFORMATIONS CLIENT\n\
         {rule}\n\
         Nom : {nom}\n\
         Email : {email}\n\
         Entreprise : {entreprise}\n\
         Téléphone : {telephone}\n\
         Budget : {budget}\n\
         \n\
         MESSAGE\n\
         {rule}\n\
         {message}\n\
         \n\
         Reçu le : {received}\n\
         \n\
         {rule}\n\
         Email automatique - {site} Contact Form\n",
        site = site_name,
        rule = rule,
        nom = contact.nom,
        email = contact.email,
        entreprise = or_unspecified(&contact.entreprise, "Non spécifiée"),
        telephone = or_unspecified(&contact.telephone, "Non spécifié"),
        budget = or_unspecified(&contact.budget, "Non spécifié"),
        message = contact.message,
        received = received.format("%d/%m/%Y à %H:%M:%S"),
    );

    (subject, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn submission(nom: &str, email: &str, message: &str) -> ContactSubmission {
        ContactSubmission {
            nom: Some(nom.to_string()),
            email: Some(email.to_string()),
            message: Some(message.to_string()),
            ..ContactSubmission::default()
        }
    }

    #[test]
    fn test_valid_submission_is_trimmed() {
        let contact = submission("  Jean ", " jean@test.com", "Bonjour\n")
            .validate()
            .unwrap();
        assert_eq!(contact.nom, "Jean");
        assert_eq!(contact.email, "jean@test.com");
        assert_eq!(contact.message, "Bonjour");
        assert_eq!(contact.entreprise, "");
    }

    #[test]
    fn test_missing_fields_in_order() {
        let mut s = submission("Jean", "jean@test.com", "Bonjour");
        s.message = None;
        assert_eq!(s.validate(), Err(ContactRejection::MissingField("message")));

        s.nom = Some("   ".to_string());
        assert_eq!(s.validate(), Err(ContactRejection::MissingField("nom")));
        assert_eq!(
            ContactRejection::MissingField("nom").message(),
            "Le champ nom est requis"
        );
    }

    #[test]
    fn test_email_shape() {
        assert_eq!(
            submission("Jean", "jean.test.com", "Bonjour").validate(),
            Err(ContactRejection::InvalidEmail)
        );
        assert_eq!(
            submission("Jean", "jean@localhost", "Bonjour").validate(),
            Err(ContactRejection::InvalidEmail)
        );
    }

    #[test]
    fn test_render_contact_email() {
        let mut s = submission("Jean", "jean@test.com", "Bonjour");
        s.entreprise = Some("Bijoux SA".to_string());
        let contact = s.validate().unwrap();
        let received = Local.with_ymd_and_hms(2025, 5, 24, 15, 27, 32).unwrap();

        let (subject, body) = render_contact_email(&contact, "Magickbot", &received);

        assert_eq!(subject, "Nouveau contact Magickbot - Jean");
        assert!(body.contains("Nom : Jean\n"));
        assert!(body.contains("Email : jean@test.com\n"));
        assert!(body.contains("Entreprise : Bijoux SA\n"));
        assert!(body.contains("Téléphone : Non spécifié\n"));
        assert!(body.contains("Budget : Non spécifié\n"));
        assert!(body.contains("\nBonjour\n"));
        assert!(body.contains("Reçu le : 24/05/2025 à 15:27:32"));
    }
}
