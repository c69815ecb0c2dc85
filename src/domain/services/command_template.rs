//! Placeholder expansion for install commands
//!
//! Recognised placeholders are `{packages}`, `{manifest}`, `{layer}` and
//! `{workdir}`. Anything else in braces (shell `${VAR}` included) is left
//! untouched.

/// Values substituted into a command template
#[derive(Debug, Clone, Default)]
pub struct TemplateVars<'a> {
    pub packages: Option<&'a str>,
    pub manifest: Option<&'a str>,
    pub layer: Option<&'a str>,
    pub workdir: Option<&'a str>,
}

impl<'a> TemplateVars<'a> {
    fn lookup(&self, name: &str) -> Option<&'a str> {
        match name {
            "packages" => self.packages,
            "manifest" => self.manifest,
            "layer" => self.layer,
            "workdir" => self.workdir,
            _ => None,
        }
    }
}

/// Expand known placeholders in `template`.
pub fn expand(template: &str, vars: &TemplateVars<'_>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find(['{', '}']) {
            // `{` before any `}`: this brace is literal, rescan from the next one
            Some(next) if after.as_bytes()[next] == b'{' => {
                out.push('{');
                rest = after;
            }
            Some(close) => {
                let name = &after[..close];
                match vars.lookup(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Whether `template` references `{name}`
pub fn mentions(template: &str, name: &str) -> bool {
    template.contains(&format!("{{{}}}", name))
}
