//! Built-in brand and SEO rules used to bootstrap an empty knowledge base.
//!
//! The rules target French-language pages and are kept in French.

use crate::knowledge::model::Category;

/// A rule waiting to be embedded and stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedRule {
    pub category: Category,
    pub content: &'static str,
}

/// Default rules, in insertion order.
pub const DEFAULT_RULES: &[SeedRule] = &[
    SeedRule {
        category: Category::BrandVoice,
        content: "Le ton de la marque doit toujours être professionnel mais empathique. Utilisez le vouvoiement. Évitez l'humour trop familier.",
    },
    SeedRule {
        category: Category::TechnicalSeo,
        content: "Les titres H1 doivent absolument contenir le mot-clé principal de la page et ne pas dépasser 60 caractères pour éviter la troncation dans les SERP.",
    },
    SeedRule {
        category: Category::TechnicalSeo,
        content: "Chaque image doit avoir un attribut 'alt' descriptif contenant si possible un mot-clé secondaire, mais sans bourrage (keyword stuffing).",
    },
    SeedRule {
        category: Category::ContentQuality,
        content: "Les paragraphes ne doivent pas dépasser 5 lignes pour faciliter la lecture sur mobile. Utilisez des listes à puces pour énumérer des éléments.",
    },
    SeedRule {
        category: Category::Strategy,
        content: "Pour les pages produits, mettez en avant les bénéfices utilisateur (avantages) avant les caractéristiques techniques.",
    },
];
