//! Read-only view of the page's custom properties.
//!
//! Recognized names: `--red` and `--green` (RGB triples such as `220,50,50`),
//! `--cols` (fixed-grid column count) and `--unit` (cell size in px).

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_POSITIVE_RGB: &str = "40,170,90";
pub const DEFAULT_NEGATIVE_RGB: &str = "220,50,50";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleContext {
    props: HashMap<String, String>,
}

impl StyleContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut ctx = Self::new();
        for (k, v) in pairs {
            ctx.set(k, v);
        }
        ctx
    }

    /// Collect every `--name: value;` declaration in a stylesheet. Later
    /// declarations win, like the cascade for a single selector.
    pub fn parse_css(css: &str) -> Self {
        let mut ctx = Self::new();
        let body = strip_comments(css);
        for decl in body.split(|c: char| c == ';' || c == '{' || c == '}') {
            let decl = decl.trim();
            if !decl.starts_with("--") {
                continue;
            }
            if let Some((name, value)) = decl.split_once(':') {
                ctx.set(name, value);
            }
        }
        ctx
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let css = std::fs::read_to_string(path)
            .with_context(|| format!("reading stylesheet {}", path.display()))?;
        Ok(Self::parse_css(&css))
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.props
            .insert(name.trim().to_string(), value.trim().to_string());
    }

    /// Trimmed property value; empty values count as unset.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.props
            .get(name)
            .map(|v| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// Leading integer of a property, the way `parseInt` reads `8` out of `8px`.
    pub fn get_int(&self, name: &str) -> Option<i64> {
        let raw = self.get(name)?;
        let end = raw
            .char_indices()
            .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
            .map(|(i, _)| i)
            .unwrap_or(raw.len());
        raw[..end].parse().ok()
    }

    pub fn positive_rgb(&self) -> &str {
        self.get("--green").unwrap_or(DEFAULT_POSITIVE_RGB)
    }

    pub fn negative_rgb(&self) -> &str {
        self.get("--red").unwrap_or(DEFAULT_NEGATIVE_RGB)
    }
}

fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}
