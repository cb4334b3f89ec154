// All LLM prompt constants for the Feedback module.
// The response schema lives here too: it is part of the same contract.

use serde_json::{json, Value};

/// Approximate word budget the system instruction asks the model to respect.
pub const WORD_BUDGET: usize = 250;

/// System instruction — role, constraints and expected structure.
pub const FEEDBACK_SYSTEM: &str = "\
Rôle : Tu es un assistant pédagogique expert.
Ta mission est de formuler des feedbacks constructifs, bienveillants et personnalisés sur des productions écrites d'apprenants.
Ton objectif est d'aider l'auteur à progresser dans sa réflexion, sa méthode et sa rédaction, sans corriger directement ni fournir la solution.

Contraintes :
- Ne pas attribuer de note chiffrée.
- Rester professionnel, clair, formateur et bienveillant.
- Ne pas dépasser environ 250 mots au total pour l'ensemble du feedback.
- Le feedback doit être structuré.
- Les points forts doivent être des éléments précis et valorisants.
- Les points à améliorer doivent décrire les problèmes sans être décourageants.
- Les pistes d'amélioration doivent être des conseils concrets et actionnables.
- Le message final doit être un encouragement positif.";

/// User prompt template. Replace `{level}`, `{tone}` and `{text}` before sending.
/// The learner text sits between `---` lines so it cannot read as instructions.
pub const FEEDBACK_PROMPT_TEMPLATE: &str = "\
Paramètres d'entrée :
Niveau de l'apprenant : {level}
Ton souhaité : {tone}
Texte à évaluer :
---
{text}
---";

/// Declared output shape passed as `responseSchema`.
pub fn feedback_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "strengths": {
                "type": "ARRAY",
                "description": "Liste des points forts du texte. Chaque élément est une chaîne de caractères.",
                "items": { "type": "STRING" }
            },
            "areasForImprovement": {
                "type": "ARRAY",
                "description": "Liste des points à améliorer dans le texte. Chaque élément est une chaîne de caractères.",
                "items": { "type": "STRING" }
            },
            "suggestions": {
                "type": "ARRAY",
                "description": "Liste des pistes d'amélioration et conseils concrets. Chaque élément est une chaîne de caractères.",
                "items": { "type": "STRING" }
            },
            "finalMessage": {
                "type": "STRING",
                "description": "Un message final d'encouragement."
            }
        },
        "required": ["strengths", "areasForImprovement", "suggestions", "finalMessage"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_requires_all_four_fields() {
        let schema = feedback_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(
            required,
            vec!["strengths", "areasForImprovement", "suggestions", "finalMessage"]
        );
    }

    #[test]
    fn test_schema_lists_are_string_arrays() {
        let schema = feedback_schema();
        for field in ["strengths", "areasForImprovement", "suggestions"] {
            assert_eq!(schema["properties"][field]["type"], "ARRAY");
            assert_eq!(schema["properties"][field]["items"]["type"], "STRING");
        }
        assert_eq!(schema["properties"]["finalMessage"]["type"], "STRING");
    }

    #[test]
    fn test_system_instruction_states_constraints() {
        assert!(FEEDBACK_SYSTEM.contains("note chiffrée"));
        assert!(FEEDBACK_SYSTEM.contains("250 mots"));
        assert!(FEEDBACK_SYSTEM.contains("sans corriger directement"));
    }

    #[test]
    fn test_template_has_every_placeholder() {
        for placeholder in ["{level}", "{tone}", "{text}"] {
            assert!(FEEDBACK_PROMPT_TEMPLATE.contains(placeholder));
        }
    }
}
