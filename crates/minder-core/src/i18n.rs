use std::str::FromStr;
use std::sync::OnceLock;

use anyhow::anyhow;
use regex::Regex;

/// Display language for user-facing strings. Anything the catalog lacks
/// falls back to English.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    #[default]
    En,
    Pt,
    He,
}

impl Lang {
    pub fn as_str(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Pt => "pt",
            Lang::He => "he",
        }
    }
}

impl FromStr for Lang {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Lang::En),
            "pt" | "pt-br" => Ok(Lang::Pt),
            "he" => Ok(Lang::He),
            other => Err(anyhow!("unknown language: {other} (expected en, pt or he)")),
        }
    }
}

fn lookup(lang: Lang, key: &str) -> Option<&'static str> {
    let text = match (lang, key) {
        (Lang::En, "empty-message") => "Nothing here yet. Add a task to get started.",
        (Lang::En, "all-done") => "All done ✨",
        (Lang::En, "tasks-remaining") => {
            "{count, plural, one {# task remaining} other {# tasks remaining}}"
        }
        (Lang::En, "overdue") => "overdue",
        (Lang::En, "seed-failed") => {
            "Failed to load initial tasks from server. You can still add tasks manually."
        }

        (Lang::Pt, "empty-message") => "Nada por aqui ainda. Adicione uma tarefa para começar.",
        (Lang::Pt, "all-done") => "Tudo feito ✨",
        (Lang::Pt, "tasks-remaining") => {
            "{count, plural, one {# tarefa restante} other {# tarefas restantes}}"
        }
        (Lang::Pt, "overdue") => "atrasada",
        (Lang::Pt, "seed-failed") => {
            "Não foi possível carregar as tarefas iniciais do servidor. Você ainda pode \
             adicionar tarefas manualmente."
        }

        (Lang::He, "empty-message") => "אין כאן כלום עדיין. הוסיפו משימה כדי להתחיל.",
        (Lang::He, "all-done") => "הכול בוצע ✨",
        (Lang::He, "tasks-remaining") => {
            "{count, plural, one {נותרה משימה אחת} other {נותרו # משימות}}"
        }
        (Lang::He, "overdue") => "באיחור",
        (Lang::He, "seed-failed") => {
            "טעינת המשימות ההתחלתיות מהשרת נכשלה. עדיין אפשר להוסיף משימות ידנית."
        }

        _ => return None,
    };
    Some(text)
}

/// Message for `key` in `lang`, falling back to English and then to the key
/// itself.
pub fn t(lang: Lang, key: &'static str) -> &'static str {
    lookup(lang, key)
        .or_else(|| lookup(Lang::En, key))
        .unwrap_or(key)
}

fn plural_re() -> Option<&'static Regex> {
    static PLURAL_RE: OnceLock<Option<Regex>> = OnceLock::new();
    PLURAL_RE
        .get_or_init(|| {
            Regex::new(r"\{count, plural, one \{([^{}]*)\} other \{([^{}]*)\}\}").ok()
        })
        .as_ref()
}

/// Message for `key` with its plural form resolved for `count`. `#` inside a
/// plural branch stands for the count itself.
pub fn t_count(lang: Lang, key: &'static str, count: usize) -> String {
    let template = t(lang, key);
    let count_text = count.to_string();

    let Some(re) = plural_re() else {
        return template.replace('#', &count_text);
    };
    let Some(caps) = re.captures(template) else {
        return template.replace('#', &count_text);
    };

    let branch = if count == 1 { &caps[1] } else { &caps[2] };
    re.replace(template, regex::NoExpand(branch))
        .replace('#', &count_text)
}

#[cfg(test)]
mod tests {
    use super::{Lang, t, t_count};

    #[test]
    fn singular_branch_selected_for_one() {
        assert_eq!(t_count(Lang::En, "tasks-remaining", 1), "1 task remaining");
    }

    #[test]
    fn plural_branch_selected_otherwise() {
        assert_eq!(
            t_count(Lang::En, "tasks-remaining", 3),
            "3 tasks remaining"
        );
        assert_eq!(
            t_count(Lang::Pt, "tasks-remaining", 2),
            "2 tarefas restantes"
        );
    }

    #[test]
    fn hebrew_singular_has_no_count_placeholder() {
        assert_eq!(t_count(Lang::He, "tasks-remaining", 1), "נותרה משימה אחת");
    }

    #[test]
    fn unknown_key_falls_back_to_itself() {
        assert_eq!(t(Lang::Pt, "no-such-key"), "no-such-key");
    }

    #[test]
    fn non_plural_template_passes_through() {
        assert_eq!(t_count(Lang::En, "all-done", 0), "All done ✨");
    }
}
