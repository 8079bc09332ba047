/// Substitutions はプレースホルダ（`{TOKEN}` 形式）と置換値の順序付き対応表。
///
/// `render` はテンプレートを先頭から一度だけ走査し、各 `{` の位置で
/// 宣言順にトークンを照合する。一致したトークンは値に置き換え、走査は
/// テンプレート側のトークン直後から再開する。置換値は再走査しないため、
/// 値にトークン文字列が含まれていてもそのまま出力される。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    entries: Vec<(&'static str, String)>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    /// トークンを末尾に追加する。同じトークンを重ねて追加した場合は先に宣言した値が使われる。
    #[must_use]
    pub fn with(mut self, token: &'static str, value: impl Into<String>) -> Self {
        self.entries.push((token, value.into()));
        self
    }

    pub fn tokens(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(token, _)| *token)
    }

    pub fn value_of(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, v)| v.as_str())
    }

    pub fn render(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(pos) = rest.find('{') {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];
            match self.match_at(tail) {
                Some((token_len, value)) => {
                    out.push_str(value);
                    rest = &tail[token_len..];
                }
                None => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }

    fn match_at(&self, tail: &str) -> Option<(usize, &str)> {
        self.entries
            .iter()
            .find(|(token, _)| tail.starts_with(token))
            .map(|(token, value)| (token.len(), value.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_is_not_rescanned() {
        let subs = Substitutions::new()
            .with("{NAME}", "{SITE_NAME}")
            .with("{SITE_NAME}", "Acme");
        assert_eq!(
            subs.render("Hi {NAME}, visit {SITE_NAME}"),
            "Hi {SITE_NAME}, visit Acme"
        );
    }

    #[test]
    fn later_token_value_is_not_rescanned_either() {
        let subs = Substitutions::new()
            .with("{SITE_NAME}", "Acme")
            .with("{NAME}", "{SITE_NAME}");
        assert_eq!(
            subs.render("{SITE_NAME}: {NAME}"),
            "Acme: {SITE_NAME}"
        );
    }

    #[test]
    fn every_occurrence_is_replaced() {
        let subs = Substitutions::new().with("{SITE_NAME}", "Acme");
        assert_eq!(
            subs.render("{SITE_NAME} / {SITE_NAME}"),
            "Acme / Acme"
        );
    }

    #[test]
    fn unknown_tokens_and_stray_braces_are_kept() {
        let subs = Substitutions::new().with("{TASK_NAME}", "Write docs");
        assert_eq!(
            subs.render("{ {UNKNOWN} {TASK_NAME}{"),
            "{ {UNKNOWN} Write docs{"
        );
    }

    #[test]
    fn multibyte_text_is_preserved() {
        let subs = Substitutions::new().with("{NAME}", "山田");
        assert_eq!(subs.render("こんにちは {NAME} さん"), "こんにちは 山田 さん");
    }

    #[test]
    fn template_without_tokens_is_unchanged() {
        let subs = Substitutions::new().with("{NAME}", "x");
        assert_eq!(subs.render("plain body"), "plain body");
        assert_eq!(subs.tokens().collect::<Vec<_>>(), vec!["{NAME}"]);
        assert_eq!(subs.value_of("{NAME}"), Some("x"));
    }
}
