use heck::{ToKebabCase, ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};

/// An identifier split into normalized parts, able to render itself in any
/// of the case conventions the templates need.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Name {
    pub parts: Vec<String>,
}

impl Name {
    pub fn new(src: &str) -> Self {
        let snake = src.to_snake_case();
        let parts = snake.split('_').map(String::from).collect();
        Self { parts }
    }

    pub fn snake_case(&self) -> String {
        self.parts.join("_")
    }

    pub fn camel_case(&self) -> String {
        self.snake_case().to_lower_camel_case()
    }

    pub fn upper_camel_case(&self) -> String {
        self.snake_case().to_upper_camel_case()
    }

    pub fn kebab_case(&self) -> String {
        self.snake_case().to_kebab_case()
    }

    /// Human-readable form, used as a display label fallback when a column
    /// carries no comment: `member_role` becomes `Member role`.
    pub fn humanized(&self) -> String {
        let mut out = self.parts.join(" ");
        if let Some(first) = out.get_mut(..1) {
            first.make_ascii_uppercase();
        }
        out
    }
}
