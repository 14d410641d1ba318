use crate::models::{ConsensusOutcome, Interpretation, RiskResult, ScaleId};
use crate::severity::{Locale, SeverityLevel};

/// Scales spanning at least this many tiers are reported as discordant.
pub const DISCORDANCE_THRESHOLD: u8 = 2;

impl ConsensusOutcome {
    pub fn is_discordant(&self) -> bool {
        self.dispersion >= DISCORDANCE_THRESHOLD
    }
}

/// Median of the three per-scale levels plus their spread.
pub fn build_consensus(result: &RiskResult) -> ConsensusOutcome {
    let mut levels: Vec<SeverityLevel> = result.iter().map(|(_, scale)| scale.level()).collect();
    levels.sort();

    let global_level = levels[levels.len() / 2];
    let dispersion = levels[levels.len() - 1].as_u8() - levels[0].as_u8();
    let per_scale_categories = ScaleId::ALL.map(|id| result.scale(id).category.clone());

    ConsensusOutcome {
        global_level,
        dispersion,
        per_scale_categories,
    }
}

struct Phrases {
    headline: &'static str,
    discordance_note: &'static str,
    categories_intro: &'static str,
}

fn phrases(locale: Locale) -> Phrases {
    match locale {
        Locale::Es => Phrases {
            headline: "Riesgo global (consenso)",
            discordance_note: " (discordancia alta entre escalas)",
            categories_intro: "Categorías por escala →",
        },
        Locale::En => Phrases {
            headline: "Overall risk (consensus)",
            discordance_note: " (high discordance between scales)",
            categories_intro: "Categories by scale →",
        },
    }
}

/// Composes the two interpretation lines shown next to the chart.
pub fn interpret(outcome: &ConsensusOutcome, locale: Locale) -> Interpretation {
    let text = phrases(locale);
    let discordant = outcome.is_discordant();
    let note = if discordant { text.discordance_note } else { "" };
    let primary = format!(
        "{}: {}{}",
        text.headline,
        outcome.global_level.label(locale),
        note
    );

    let per_scale: Vec<String> = ScaleId::ALL
        .iter()
        .map(|id| format!("{}: {}", id.report_label(), outcome.category(*id)))
        .collect();
    let secondary = format!("{} {}", text.categories_intro, per_scale.join(" · "));

    Interpretation {
        primary,
        secondary,
        discordant,
    }
}
