//! Prompts for the outreach email generator

use crate::config::GeneratorConfig;

/// Role given to the model for every request
pub const SYSTEM_PROMPT: &str = "Tu es un expert en prospection commerciale B2B dans le secteur \
de la bijouterie. Tu rédiges des e-mails de prospection personnalisés et convaincants qui évitent \
les filtres anti-spam.";

/// Used when a row has no description
pub const DEFAULT_DESCRIPTION: &str = "Bijouterie";

/// Used when a row has no website
pub const DEFAULT_WEBSITE: &str = "Site web non disponible";

/// The business an email is written for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prospect {
    pub name: String,
    pub description: String,
    pub website: String,
}

impl Prospect {
    fn description_or_default(&self) -> &str {
        non_blank_or(&self.description, DEFAULT_DESCRIPTION)
    }

    fn website_or_default(&self) -> &str {
        non_blank_or(&self.website, DEFAULT_WEBSITE)
    }
}

fn non_blank_or<'a>(value: &'a str, default: &'a str) -> &'a str {
    let value = value.trim();
    if value.is_empty() {
        default
    } else {
        value
    }
}

/// Builds the user prompt for one prospect
///
/// The model is asked to answer with a JSON object holding `objet` and
/// `corps`, and to only use the links given here.
pub fn build_prompt(config: &GeneratorConfig, prospect: &Prospect) -> String {
    format!(
        r#"
Tu es {sender}, expert en prospection commerciale B2B dans le secteur de la bijouterie.

Contexte :
- Tu contactes la bijouterie "{name}".
- Voici leur description publique : "{description}"
- Leur site web : {website}
- Tu proposes un service de **chatbot intelligent** adapté aux bijouteries : disponible 24h/24 pour répondre à toutes les questions des clients, conseiller, générer des ventes, gérer le SAV, soulager les équipes et améliorer l'expérience client.

Ta mission :
- Rédige un e-mail de prospection **personnalisé** et convaincant, en mettant en avant :
    * La valeur ajoutée pour cette bijouterie en particulier (adapte le texte à leur univers, gamme ou valeur)
    * Le fait que tu as déjà créé un chatbot spécialement pour leur site web après avoir analysé leur activité
    * Que si cela les intéresse, ils peuvent booker un créneau avec toi pour une démo en live personnalisée
    * Pendant cette démo, tu pourras poser des questions sur leur site, comprendre leurs besoins spécifiques et leur montrer exactement comment le chatbot peut s'adapter à leur bijouterie
    * Un lien vers ton site web professionnel : {website_url}
    * Un lien pour réserver un créneau dans ton agenda : {booking_url}
    * Ton numéro de téléphone : {phone}
- L'e-mail doit être court (6 à 8 lignes), humain, professionnel, et donner envie de booker un rendez-vous pour la démo personnalisée.
- Termine par une phrase d'appel à l'action claire pour booker la démo.
- Commence toujours par "Bonjour," en t'adressant au responsable, sans formule trop générique.
- Signe avec "Cordialement, {sender}" et ajoute ton numéro de téléphone.
- ULTRA IMPORTANT : L'e-mail doit avoir l'air écrit par un humain au maximum. Utilise un ton naturel, spontané et authentique. Évite le jargon commercial et les formules trop polies ou robotiques.
- IMPORTANT : Évite les mots qui déclenchent les filtres anti-spam comme "gratuit", "urgent", "offre limitée", "garantie", "promotion".
- Utilise un ton naturel et professionnel, évite les majuscules excessives et les points d'exclamation multiples.

**Réponds strictement au format JSON suivant :**
{{
  "objet": "Titre de l'objet du mail (professionnel, sans mots spam)",
  "corps": "Le corps du texte du mail"
}}

Langue du message : {language}

N'ajoute jamais de liens imaginaires : les liens doivent être exactement ceux ci-dessus.
"#,
        sender = config.sender_name,
        name = prospect.name.trim(),
        description = prospect.description_or_default(),
        website = prospect.website_or_default(),
        website_url = config.website_url,
        booking_url = config.booking_url,
        phone = config.sender_phone,
        language = config.language,
    )
}
