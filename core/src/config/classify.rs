//! Boss id → archetype classification

use phf::phf_map;

use crate::bosses::BossArchetype;

/// Lowercase keywords recognised inside a boss id.
static BOSS_KEYWORDS: phf::Map<&'static str, BossArchetype> = phf_map! {
    "cyber" => BossArchetype::Cyberboss,
    "void" => BossArchetype::VoidHarbinger,
    "harbinger" => BossArchetype::VoidHarbinger,
    "overclock" => BossArchetype::Overclocker,
    "trojan" => BossArchetype::TrojanWyrm,
    "wyrm" => BossArchetype::TrojanWyrm,
    "worm" => BossArchetype::TrojanWyrm,
};

/// Pick the phase machine for a boss id by case-insensitive keyword match.
///
/// When several keywords appear, the one starting earliest wins; ties go to
/// the longer keyword. Unknown ids return `None` (the boss gets no AI).
pub fn classify_boss_id(boss_id: &str) -> Option<BossArchetype> {
    let id = boss_id.to_lowercase();
    BOSS_KEYWORDS
        .entries()
        .filter_map(|(keyword, archetype)| id.find(keyword).map(|pos| (pos, keyword.len(), *archetype)))
        .min_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
        .map(|(_, _, archetype)| archetype)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_ids() {
        assert_eq!(classify_boss_id("cyberboss"), Some(BossArchetype::Cyberboss));
        assert_eq!(classify_boss_id("void_harbinger"), Some(BossArchetype::VoidHarbinger));
        assert_eq!(classify_boss_id("overclocker"), Some(BossArchetype::Overclocker));
        assert_eq!(classify_boss_id("trojan_wyrm"), Some(BossArchetype::TrojanWyrm));
    }

    #[test]
    fn case_insensitive_substrings() {
        assert_eq!(classify_boss_id("Boss_CYBER_Mk2"), Some(BossArchetype::Cyberboss));
        assert_eq!(classify_boss_id("the-harbinger"), Some(BossArchetype::VoidHarbinger));
        assert_eq!(classify_boss_id("bookworm"), Some(BossArchetype::TrojanWyrm));
    }

    #[test]
    fn earliest_keyword_wins() {
        assert_eq!(classify_boss_id("void_cyber"), Some(BossArchetype::VoidHarbinger));
        assert_eq!(classify_boss_id("cyber_void"), Some(BossArchetype::Cyberboss));
    }

    #[test]
    fn unknown_id() {
        assert_eq!(classify_boss_id("training_dummy"), None);
        assert_eq!(classify_boss_id(""), None);
    }
}
