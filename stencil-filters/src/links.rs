//! Absolute URL construction

use liquid_core::{
    Display_filter, Expression, Filter, FilterParameters, FilterReflection, FromFilterParameters,
    ParseFilter, Result, Runtime, Value, ValueView,
};
use url::Url;

/// Returns `base` with `path` joined onto its path component.
///
/// The joined path is cleaned: empty and `.` segments are dropped, `..`
/// removes the previous segment, and no trailing slash is kept. Query and
/// fragment of `base` are preserved.
pub fn abs_url(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    let joined = clean_path(&format!("{}/{}", base.path(), path));
    url.set_path(&joined);
    url
}

fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    format!("/{}", segments.join("/"))
}

#[derive(Debug, FilterParameters)]
struct AbsUrlArgs {
    #[parameter(description = "The path to join onto the base URL.")]
    path: Expression,
}

/// `{{ base | abs_url: "path" }}` joins `path` onto the base URL.
#[derive(Clone, ParseFilter, FilterReflection)]
#[filter(
    name = "abs_url",
    description = "Builds an absolute URL by joining a path onto the input base URL.",
    parameters(AbsUrlArgs),
    parsed(AbsUrlFilter)
)]
pub struct AbsUrl;

#[derive(Debug, FromFilterParameters, Display_filter)]
#[name = "abs_url"]
struct AbsUrlFilter {
    #[parameters]
    args: AbsUrlArgs,
}

impl Filter for AbsUrlFilter {
    fn evaluate(&self, input: &dyn ValueView, runtime: &dyn Runtime) -> Result<Value> {
        let args = self.args.evaluate(runtime)?;
        let raw = input.to_kstr();
        let base = Url::parse(raw.as_str()).map_err(|e| {
            liquid_core::Error::with_msg(format!("Invalid input: '{}' is not a URL: {}", raw, e))
        })?;
        let path = args.path.to_kstr();
        Ok(Value::scalar(abs_url(&base, path.as_str()).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FilterSet;
    use rstest::rstest;

    #[rstest]
    #[case("https://example.com", "posts/one", "https://example.com/posts/one")]
    #[case("https://example.com/", "/posts/one/", "https://example.com/posts/one")]
    #[case("https://example.com/blog", "posts", "https://example.com/blog/posts")]
    #[case("https://example.com/blog/", "../about", "https://example.com/about")]
    #[case("https://example.com/a/b", "./c//d", "https://example.com/a/b/c/d")]
    #[case("https://example.com/", "", "https://example.com/")]
    fn test_abs_url(#[case] base: &str, #[case] path: &str, #[case] expected: &str) {
        let base = Url::parse(base).unwrap();
        assert_eq!(abs_url(&base, path).as_str(), expected);
    }

    #[test]
    fn test_abs_url_keeps_query() {
        let base = Url::parse("https://example.com/docs?lang=en").unwrap();
        assert_eq!(
            abs_url(&base, "intro").as_str(),
            "https://example.com/docs/intro?lang=en"
        );
    }

    #[test]
    fn test_abs_url_does_not_modify_base() {
        let base = Url::parse("https://example.com/root").unwrap();
        let _ = abs_url(&base, "child");
        assert_eq!(base.as_str(), "https://example.com/root");
    }

    #[test]
    fn test_abs_url_filter() {
        let parser = FilterSet::builtin()
            .register(liquid::ParserBuilder::with_stdlib())
            .build()
            .unwrap();
        let globals = liquid::object!({ "site": { "base_url": "https://example.com/site/" } });
        let output = parser
            .parse(r#"{{ site.base_url | abs_url: "css/main.css" }}"#)
            .unwrap()
            .render(&globals)
            .unwrap();
        assert_eq!(output, "https://example.com/site/css/main.css");
    }

    #[test]
    fn test_abs_url_filter_invalid_base() {
        let parser = FilterSet::builtin()
            .register(liquid::ParserBuilder::with_stdlib())
            .build()
            .unwrap();
        let err = parser
            .parse(r#"{{ "not a url" | abs_url: "x" }}"#)
            .unwrap()
            .render(&liquid::Object::new())
            .unwrap_err();
        assert!(err.to_string().contains("is not a URL"));
    }
}
