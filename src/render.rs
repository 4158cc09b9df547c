//! Per-route rendering capability.
//!
//! A route handler produces an optional [`serde_json::Value`] model; the
//! renderer attached to the route at registration time turns that model into
//! the body string. Selecting the variant at registration keeps dispatch free
//! of any result-type inspection.

use minijinja::Environment;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

type TransformFn = dyn Fn(&Value) -> Result<String, anyhow::Error> + Send + Sync;

/// Turns a route handler's model into the response body.
#[derive(Clone, Default)]
pub enum Renderer {
    /// Plain route: a string model passes through, `null` renders nothing,
    /// anything else renders as its JSON text.
    #[default]
    Identity,
    /// Render the model as context into a compiled template.
    Template {
        engine: Arc<Environment<'static>>,
        template: String,
    },
    /// User-supplied transformation from model to body string.
    Transform(Arc<TransformFn>),
}

impl Renderer {
    #[must_use]
    pub fn identity() -> Self {
        Renderer::Identity
    }

    /// Compile `source` under `name` into a single-template environment.
    pub fn template(name: &str, source: &str) -> Result<Self, anyhow::Error> {
        let mut engine = Environment::new();
        engine.add_template_owned(name.to_string(), source.to_string())?;
        Ok(Renderer::Template {
            engine: Arc::new(engine),
            template: name.to_string(),
        })
    }

    /// Wrap a user-supplied transformer.
    pub fn transform<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<String, anyhow::Error> + Send + Sync + 'static,
    {
        Renderer::Transform(Arc::new(f))
    }

    /// JSON transformer: serializes whatever model the handler returns.
    #[must_use]
    pub fn json() -> Self {
        Self::transform(|value| Ok(serde_json::to_string(value)?))
    }

    /// Render `value` to a body string.
    ///
    /// `None` renders nothing, which lets a body set earlier in the chain
    /// survive. A renderer failure is a fault like any other.
    pub fn render(&self, value: Option<&Value>) -> Result<Option<String>, anyhow::Error> {
        let Some(value) = value else {
            return Ok(None);
        };
        match self {
            Renderer::Identity => Ok(match value {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            }),
            Renderer::Template { engine, template } => {
                let rendered = engine.get_template(template)?.render(value)?;
                Ok(Some(rendered))
            }
            Renderer::Transform(f) => f(value).map(Some),
        }
    }
}

/// Convert any serializable model into the handler return value.
///
/// ```
/// use serde::Serialize;
/// use shunt::render::to_model;
///
/// #[derive(Serialize)]
/// struct Greeting { who: String }
///
/// let model = to_model(Greeting { who: "world".into() }).unwrap();
/// assert_eq!(model["who"], "world");
/// ```
pub fn to_model<T: Serialize>(value: T) -> Result<Value, anyhow::Error> {
    Ok(serde_json::to_value(value)?)
}
