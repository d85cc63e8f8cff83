use serde_json::Value;

/// Delta used when a record carries neither `d1` nor `delta`.
pub const DEFAULT_DELTA: f64 = 0.1;

/// Canonical item after normalization. Created per fetch cycle and dropped
/// once encoded.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttentionItem {
    pub score: f64,
    pub delta: f64,
    pub title: String,
    pub source: String,
    pub url: Option<String>,
}

impl AttentionItem {
    pub fn new(score: f64, delta: f64) -> Self {
        Self {
            score,
            delta,
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }
}

/// Map an arbitrary record into an `AttentionItem`.
///
/// Field precedence:
/// - `score`: numeric `score`, else `0`
/// - `delta`: numeric `d1`, else numeric `delta`, else [`DEFAULT_DELTA`]
/// - `title`: string `title`, else string `name`, else empty
/// - `source`: string `source`, else empty
/// - `url`: string `url`; `null` and non-strings become `None`
///
/// Fields of the wrong type are treated as absent. Non-object records
/// normalize to an all-default item.
pub fn normalize(raw: &Value) -> AttentionItem {
    let num = |key: &str| raw.get(key).and_then(Value::as_f64).filter(|v| v.is_finite());
    let text = |key: &str| raw.get(key).and_then(Value::as_str);

    AttentionItem {
        score: num("score").unwrap_or(0.0),
        delta: num("d1").or_else(|| num("delta")).unwrap_or(DEFAULT_DELTA),
        title: text("title").or_else(|| text("name")).unwrap_or("").to_string(),
        source: text("source").unwrap_or("").to_string(),
        url: text("url").map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_record() {
        let item = normalize(&json!({
            "score": 0.75, "d1": -0.2, "title": "rust", "source": "reddit", "url": "https://x.test/a"
        }));
        assert_eq!(item.score, 0.75);
        assert_eq!(item.delta, -0.2);
        assert_eq!(item.title, "rust");
        assert_eq!(item.source, "reddit");
        assert_eq!(item.url.as_deref(), Some("https://x.test/a"));
    }

    #[test]
    fn test_delta_precedence() {
        assert_eq!(normalize(&json!({"d1": 0.3, "delta": -0.9})).delta, 0.3);
        assert_eq!(normalize(&json!({"delta": -0.9})).delta, -0.9);
        assert_eq!(normalize(&json!({})).delta, DEFAULT_DELTA);
        // non-numeric d1 falls through to delta
        assert_eq!(normalize(&json!({"d1": "up", "delta": 0.4})).delta, 0.4);
    }

    #[test]
    fn test_title_falls_back_to_name() {
        assert_eq!(normalize(&json!({"name": "n"})).title, "n");
        assert_eq!(normalize(&json!({"title": "t", "name": "n"})).title, "t");
        assert_eq!(normalize(&json!({"title": 5, "name": "n"})).title, "n");
        assert_eq!(normalize(&json!({})).title, "");
    }

    #[test]
    fn test_wrong_types_become_defaults() {
        let item = normalize(&json!({"score": "high", "url": null, "source": 1}));
        assert_eq!(item.score, 0.0);
        assert_eq!(item.url, None);
        assert_eq!(item.source, "");
    }

    #[test]
    fn test_non_object_record() {
        assert_eq!(normalize(&json!(42)), AttentionItem::new(0.0, DEFAULT_DELTA));
        assert_eq!(normalize(&Value::Null).title, "");
    }

    #[test]
    fn test_integer_score_accepted() {
        assert_eq!(normalize(&json!({"score": 1})).score, 1.0);
    }
}
