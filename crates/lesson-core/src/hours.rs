use regex::Regex;
use std::sync::OnceLock;

use crate::lenient::fold_digits;

static LABELED_RE: OnceLock<Regex> = OnceLock::new();
static LOOSE_RE: OnceLock<Regex> = OnceLock::new();

/// `【授業時間数】5`, `[授業時間数]: 5`, `〔授業時間数〕 ５`
fn labeled_re() -> &'static Regex {
    LABELED_RE.get_or_init(|| {
        Regex::new(r"[【\[〔［]\s*授業時間数\s*[】\]〕］]\s*[:：]?\s*([0-9]{1,2})").unwrap()
    })
}

/// `授業時間数：5時間`, `授業時間数は全8時間`
fn loose_re() -> &'static Regex {
    LOOSE_RE.get_or_init(|| Regex::new(r"授業時間数[^0-9\n]{0,8}?([0-9]{1,2})").unwrap())
}

/// The hour count the requester asked for, if the prompt states one.
///
/// The bracketed label is tried first, then the looser keyword form. Only
/// the first 1–2 digit run is read, so the result is always in `1..=99`;
/// an explicit `0` is treated as no request.
pub fn requested_hours(prompt: &str) -> Option<u32> {
    let folded = fold_digits(prompt);
    [labeled_re(), loose_re()]
        .iter()
        .find_map(|re| re.captures(&folded))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_bracketed_label() {
        assert_eq!(requested_hours("【授業時間数】5 単元名：ありの行列"), Some(5));
        assert_eq!(requested_hours("[授業時間数]: 12"), Some(12));
    }

    #[test]
    fn reads_loose_keyword_form() {
        assert_eq!(requested_hours("学年：3年\n授業時間数：8時間"), Some(8));
        assert_eq!(requested_hours("授業時間数は全6時間です"), Some(6));
    }

    #[test]
    fn reads_full_width_digits() {
        assert_eq!(requested_hours("【授業時間数】１０"), Some(10));
    }

    #[test]
    fn takes_only_first_two_digits() {
        assert_eq!(requested_hours("【授業時間数】123"), Some(12));
    }

    #[test]
    fn labeled_form_wins_over_earlier_loose_mention() {
        let prompt = "授業時間数の目安は4くらい\n【授業時間数】7";
        assert_eq!(requested_hours(prompt), Some(7));
    }

    #[test]
    fn missing_or_zero_is_none() {
        assert_eq!(requested_hours("単元名：スイミー"), None);
        assert_eq!(requested_hours("【授業時間数】未定"), None);
        assert_eq!(requested_hours("【授業時間数】0"), None);
        assert_eq!(requested_hours(""), None);
    }
}
