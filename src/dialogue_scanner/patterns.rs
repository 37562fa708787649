// WHY: Detection and removal expressions are composed from shared fragments so the
// quote set, name shape, and verb list stay identical across every pass

use anyhow::Result;
use regex_automata::meta::Regex;

/// Attribution verbs recognized by the said-verb and quote-then-said passes
pub const ATTRIBUTION_VERBS: &[&str] = &[
    "said", "asked", "replied", "whispered", "shouted", "called", "exclaimed", "muttered",
    "interrupted",
];

/// Compiled expressions used by one scanner instance
#[derive(Debug)]
pub struct PatternSet {
    /// `Name: "text"` at line start; group 1 = name, group 2 = text
    pub colon: Regex,
    /// `Name said "text"`; group 1 = name, group 2 = text
    pub said_verb: Regex,
    /// `"text," Name said`; group 1 = text, group 2 = name
    pub quote_then_said: Regex,
    /// Removal passes for narrative extraction, applied in order
    pub removals: Vec<Regex>,
}

impl PatternSet {
    pub fn new(min_dialogue_len: usize) -> Result<Self> {
        // Compositional pattern components
        let quote = r#"["\u{201C}\u{201D}]"#;
        let not_quote = r#"[^"\u{201C}\u{201D}]"#;
        let verbs = format!("(?i:{})", ATTRIBUTION_VERBS.join("|"));
        let colon_name = r"[A-Z][a-zA-Z \t]{1,24}";
        let attributed_name = r"[A-Z][a-zA-Z \t]{2,25}";
        let dialogue = format!("{not_quote}{{{min_dialogue_len},}}");
        let any_dialogue = format!("{not_quote}*");
        // attribution must follow the closing quote on the same line
        let attribution_gap = r"[ \t]*";
        let clause_tail = r#"[^.!?"\u{201C}\u{201D}\n]*[.!?]?"#;

        // Detection patterns
        let colon = format!(
            r"(?m)^[ \t]*({colon_name})[ \t]*:[ \t]*{quote}({dialogue}){quote}"
        );
        let said_verb = format!(
            r"({attributed_name})\s+{verbs}[\s,:]*{quote}({dialogue}){quote}"
        );
        let quote_then_said = format!(
            r"{quote}({dialogue}){quote}[,.]?{attribution_gap}({attributed_name})\s+{verbs}"
        );

        // Removal patterns mirror the detection shapes but accept any quoted span length
        let remove_colon_line = format!(
            r"(?m)^[ \t]*{colon_name}[ \t]*:[ \t]*{quote}{any_dialogue}{quote}.*$"
        );
        let remove_quote_then_said = format!(
            r"(?i){quote}{any_dialogue}{quote}[,.]?{attribution_gap}{attributed_name}\s+{verbs}{clause_tail}"
        );
        let remove_said_verb = format!(
            r"{attributed_name}\s+{verbs}[\s,:]*{quote}{any_dialogue}{quote}"
        );
        let remove_quoted = format!("{quote}{any_dialogue}{quote}");

        Ok(Self {
            colon: Regex::new(&colon)?,
            said_verb: Regex::new(&said_verb)?,
            quote_then_said: Regex::new(&quote_then_said)?,
            removals: vec![
                Regex::new(&remove_colon_line)?,
                Regex::new(&remove_quote_then_said)?,
                Regex::new(&remove_said_verb)?,
                Regex::new(&remove_quoted)?,
            ],
        })
    }
}
