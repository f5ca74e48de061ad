use crate::errors::PipelineError;

/// Output labels the invocation prompt asks for, in template order.
pub mod labels {
    pub const ARABIC: &str = "Texte arabe";
    pub const TRANSLITERATION: &str = "Translitération";
    pub const TRANSLATION: &str = "Traduction";
    pub const SOURCE: &str = "Source";
    pub const AUTHENTICITY: &str = "Authentication";
    pub const THEMES: &str = "Thèmes";
    pub const CONTEXT: &str = "Contexte";
    pub const BENEFITS: &str = "Bienfaits";
    pub const OCCASIONS: &str = "Occasions";

    pub const ALL: [&str; 9] = [
        ARABIC, TRANSLITERATION, TRANSLATION, SOURCE, AUTHENTICITY, THEMES, CONTEXT, BENEFITS, OCCASIONS,
    ];
}

pub const DIAGNOSTIC_PROMPT: &str = "Réponds simplement avec 'Bismillah'";

/// Trim user input and reject blank text before anything reaches the network.
pub fn require_text<'a>(input: &'a str, what: &str) -> Result<&'a str, PipelineError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PipelineError::Validation(format!("{what} must not be empty")));
    }
    Ok(trimmed)
}

fn invocation_template() -> String {
    use labels::*;
    let hints = [
        (ARABIC, "texte arabe de la dua"),
        (TRANSLITERATION, "translitération en caractères latins"),
        (TRANSLATION, "traduction en français"),
        (SOURCE, "source de la dua - Quran (Sourate:Verset) ou Hadith (Nom du recueil, numéro)"),
        (AUTHENTICITY, "Sahih/Hassan/Daif - niveau d'authenticité si connu"),
        (THEMES, "liste de mots-clés séparés par des virgules"),
        (CONTEXT, "bref contexte d'utilisation de cette dua"),
        (BENEFITS, "bienfaits spirituels de cette dua, séparés par des virgules"),
        (OCCASIONS, "quand réciter cette dua, séparées par des virgules"),
    ];
    hints
        .iter()
        .map(|(label, hint)| format!("{label}: [{hint}]"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn invocation_constraints() -> &'static str {
r#"Important:
- Privilégie les duas authentiques du Coran ou des hadiths.
- Si tu n'es pas absolument certain d'une information, donne la meilleure réponse possible basée sur tes connaissances.
- Si tu ne connais pas le texte arabe exact, fournis une approximation en précisant que c'est une approximation.
- Pour les sources, si tu n'es pas certain, précise qu'il s'agit d'une source approximative ou générale.
- Inclus toujours une translitération et une traduction, même si elles sont approximatives.
- Réponds TOUJOURS dans le format demandé, une étiquette par ligne, sans en omettre aucune, même si certaines informations sont partielles."#
}

fn answer_rules() -> &'static str {
r#"Instructions importantes:
1. Si tu connais la réponse avec certitude et qu'elle est basée sur des sources islamiques fiables (Coran, hadiths authentiques), réponds avec précision.
2. Si tu n'es pas certain ou si la question touche à un sujet complexe/controversé, indique clairement les limites de ta connaissance.
3. Si tu ne connais pas la réponse ou si elle nécessite l'avis d'un érudit, réponds: "Je n'ai pas suffisamment d'informations pour répondre à cette question avec précision."
4. Ne jamais inventer des citations coraniques ou des hadiths.
5. Pour les questions de jurisprudence (fiqh), précise qu'il peut y avoir des différences d'opinions entre les écoles de pensée.

Fournis UNIQUEMENT une réponse textuelle directe, sans formatage JSON, Markdown ou autre.
Ne commence pas par "Voici ma réponse" ou des phrases similaires - donne directement la réponse."#
}

/// Instruction for generating one invocation. `intention` is embedded verbatim.
pub fn invocation_prompt(intention: &str) -> String {
    format!(
        r#"Tu es un expert en invocations islamiques (duas). En te basant sur l'intention ou la situation suivante: "{intention}", trouve et génère une dua appropriée.

Format attendu (respecte strictement ce format sans ajouter d'autres caractères):

{template}

{constraints}"#,
        template = invocation_template(),
        constraints = invocation_constraints(),
    )
}

pub fn answer_prompt(question: &str) -> String {
    format!(
        r#"Tu es un assistant islamique respectueux et précis. On te pose la question suivante sur l'islam:

"{question}"

{rules}"#,
        rules = answer_rules(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invocation_prompt_embeds_intention_and_every_label() {
        let p = invocation_prompt("réussir mes examens");
        assert!(p.contains("\"réussir mes examens\""));
        for label in labels::ALL {
            assert!(p.contains(&format!("\n{label}: [")), "missing label line {label}");
        }
        assert!(p.contains("sans en omettre aucune"));
    }

    #[test]
    fn prompts_are_deterministic() {
        assert_eq!(invocation_prompt("paix"), invocation_prompt("paix"));
        assert_eq!(answer_prompt("Qu'est-ce que la zakat ?"), answer_prompt("Qu'est-ce que la zakat ?"));
    }

    #[test]
    fn answer_prompt_forbids_structured_output() {
        let p = answer_prompt("Combien de prières par jour ?");
        assert!(p.contains("Combien de prières par jour ?"));
        assert!(p.contains("sans formatage JSON"));
    }

    #[test]
    fn require_text_trims_and_rejects_blank() {
        assert_eq!(require_text("  paix \n", "intention").unwrap(), "paix");
        let err = require_text(" \t\n", "intention").unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));
    }
}
