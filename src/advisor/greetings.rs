//! Welcome lines shown to pilgrims while a search runs.

use rand::seq::SliceRandom;

pub const WELCOME_MESSAGES: &[&str] = &[
    "أهلاً بك يا ضيف الرحمن، نسأل الله لك حجاً مبروراً وسعياً مشكوراً. \u{2728}",
    "حياك الله في رحاب مكة، نسأل الله أن يتقبل طاعاتكم ويحفظكم. \u{1F932}",
    "يا باغي الخير أقبل، أهلاً بك في بيت الله الحرام، ونسأل الله لك الصحة والعافية. \u{1F54B}",
    "تقبل الله منا ومنكم صالح الأعمال، تفضل هذه الخيارات الآمنة والموثوقة لك. \u{2705}",
    "أهلاً بزوار بيت الله، نسأل الله لكم السلامة في حلكم وترحالكم. \u{2764}\u{FE0F}",
    "طاب ممشاكم وتبوأتم من الجنة مقعداً، نسأل الله أن يرزقكم القبول والرضا. \u{2728}",
    "يا ضيف بيت الله، عافاك الله وشافاك، ورزقك القوة على تمام النسك. \u{1F64C}",
];

/// A random welcome line.
pub fn pick() -> &'static str {
    WELCOME_MESSAGES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(WELCOME_MESSAGES[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_returns_known_message() {
        for _ in 0..20 {
            assert!(WELCOME_MESSAGES.contains(&pick()));
        }
    }
}
