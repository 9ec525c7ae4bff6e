//! Request synthesis: one [`CollectionItem`] per operation.
//!
//! An item carries the templated URL (see [`crate::url`]), header and query
//! bindings, a materialized body, response examples, and the two generated
//! scripts (see [`crate::scripts`]).
//!
//! Body precedence:
//!
//! 1. A profile text body matching method and path suffix (transaction DSL).
//! 2. OpenAPI 3 `requestBody`: explicit `example`, then the first of
//!    `examples`, then synthesis of the media schema.
//! 3. Swagger 2 `in: body` parameter, synthesized with the profile's
//!    body-parameter exclusions.
//! 4. Swagger 2 `formData` parameters, as a flat JSON object.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use specpost_define::{
    CollectionItem, DependencyEntry, Header, ParameterLocation, Profile, QueryParam, RequestBody, ResponseExample,
};
use tracing::{debug, trace};

use crate::scripts;
use crate::spec::{InterfaceSpec, Operation, Parameter};
use crate::synth::Synthesizer;
use crate::url::build_url;

pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Builds collection items for operations of one interface description.
pub struct RequestBuilder<'a> {
    spec: &'a InterfaceSpec,
    profile: &'a Profile,
    synthesizer: Synthesizer<'a>,
    body_parameters: Synthesizer<'a>,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(spec: &'a InterfaceSpec, profile: &'a Profile) -> Self {
        Self {
            spec,
            profile,
            synthesizer: Synthesizer::with_strategy(spec, profile.strategy),
            body_parameters: Synthesizer::with_strategy(spec, profile.strategy)
                .exclusions(profile.body_parameter_exclusions.clone()),
        }
    }

    /// Pins the clock used for synthesized timestamps.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.synthesizer = self.synthesizer.at(now);
        self.body_parameters = self.body_parameters.at(now);
        self
    }

    /// Compiles `operation` into a runnable item.
    ///
    /// ## Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use specpost_define::{DependencyEntry, Profile};
    /// use specpost_gen::request::RequestBuilder;
    /// use specpost_gen::spec::InterfaceSpec;
    ///
    /// let spec = InterfaceSpec::from_value(json!({
    ///     "openapi": "3.0.0",
    ///     "paths": {"/v1/organizations/{id}": {"get": {
    ///         "summary": "Retrieve an Organization",
    ///         "responses": {"200": {"description": "ok"}}
    ///     }}}
    /// }));
    /// let profile = Profile::ledger();
    /// let operations = spec.operations();
    /// let op = &operations[0];
    ///
    /// let item = RequestBuilder::new(&spec, &profile).build_item(op, &DependencyEntry::default());
    /// assert_eq!(item.name, "Retrieve an Organization");
    /// assert_eq!(item.url.raw(), "{{onboardingUrl}}/v1/organizations/{{organizationId}}");
    /// ```
    pub fn build_item(&self, operation: &Operation<'_>, deps: &DependencyEntry) -> CollectionItem {
        let parameters = operation.parameters(self.spec);

        let query = parameters
            .iter()
            .filter(|p| p.location == ParameterLocation::Query)
            .map(|p| QueryParam {
                key: p.name.clone(),
                value: p.preset_value(),
                description: p.description.clone(),
                disabled: !p.required,
            })
            .collect();

        let mut headers: Vec<Header> = parameters
            .iter()
            .filter(|p| p.location == ParameterLocation::Header)
            .map(|p| self.header(p))
            .collect();

        let body = self.body(operation, &parameters);
        match &body {
            Some(RequestBody::Json(_)) => headers.push(Header::new("Content-Type", JSON_MEDIA_TYPE)),
            Some(RequestBody::Text(_)) => headers.push(Header::new("Content-Type", "text/plain")),
            None => {}
        }

        let name = operation
            .summary()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} {}", operation.method, operation.path));

        trace!(endpoint = %operation.key(), %name, "built item");

        CollectionItem {
            name,
            method: operation.method,
            path: operation.path.to_string(),
            url: build_url(operation.path, self.profile, query),
            headers,
            body,
            description: operation.description().map(str::to_string),
            pre_request_script: scripts::pre_request(&self.profile.auth_variable, deps),
            test_script: scripts::test_script(operation.method, operation.path, deps),
            response_examples: self.response_examples(operation),
        }
    }

    fn header(&self, param: &Parameter) -> Header {
        let preset = param.preset_value();
        let value = if !preset.is_empty() {
            preset
        } else if param.name.eq_ignore_ascii_case("authorization") {
            format!("Bearer {{{{{}}}}}", self.profile.auth_variable)
        } else if param.name.eq_ignore_ascii_case("x-request-id") {
            "{{$guid}}".to_string()
        } else {
            String::new()
        };

        let header = Header::new(param.name.clone(), value);
        match &param.description {
            Some(description) => header.with_description(description.clone()),
            None => header,
        }
    }

    fn body(&self, operation: &Operation<'_>, parameters: &[Parameter]) -> Option<RequestBody> {
        if let Some(text) = self.profile.text_body_for(operation.method, operation.path) {
            debug!(endpoint = %operation.key(), "using fixed text body");
            return Some(RequestBody::Text(text.content.clone()));
        }

        if let Some(request_body) = operation.request_body(self.spec) {
            return self.media_example(request_body).map(RequestBody::Json);
        }

        if let Some(schema) = parameters
            .iter()
            .find(|p| p.location == ParameterLocation::Body)
            .and_then(|p| p.schema.as_ref())
        {
            return Some(RequestBody::Json(self.body_parameters.synthesize(schema)));
        }

        let form: Map<String, Value> = parameters
            .iter()
            .filter(|p| p.location == ParameterLocation::FormData)
            .map(|p| {
                let value = match (&p.default, &p.example, &p.schema) {
                    (Some(v), _, _) | (None, Some(v), _) => v.clone(),
                    (None, None, Some(schema)) => self.synthesizer.synthesize_property(&p.name, schema),
                    (None, None, None) => Value::String(String::new()),
                };
                (p.name.clone(), value)
            })
            .collect();
        (!form.is_empty()).then(|| RequestBody::Json(Value::Object(form)))
    }

    /// Example for an OpenAPI 3 request body or response `content` holder.
    fn media_example(&self, holder: &Value) -> Option<Value> {
        let media = preferred_media(holder)?;
        if let Some(example) = media.get("example") {
            return Some(example.clone());
        }
        if let Some((_, first)) = named_examples(self.spec, media).into_iter().next() {
            return Some(first);
        }
        media.get("schema").map(|schema| self.synthesizer.synthesize(schema))
    }

    fn response_examples(&self, operation: &Operation<'_>) -> Vec<ResponseExample> {
        let mut out = Vec::new();

        for (code, response) in operation.responses().into_iter().flatten() {
            let Ok(status) = code.parse::<u16>() else {
                trace!(endpoint = %operation.key(), %code, "skipping non-numeric response key");
                continue;
            };
            let response = self.spec.resolve(response);
            let reason = reason_phrase(status);
            let base_name = format!("{status} {reason}").trim_end().to_string();

            for (label, body) in self.response_bodies(response) {
                out.push(ResponseExample {
                    name: match label {
                        Some(label) => format!("{base_name} ({label})"),
                        None => base_name.clone(),
                    },
                    status,
                    reason: reason.to_string(),
                    body,
                });
            }
        }

        out
    }

    fn response_bodies(&self, response: &Value) -> Vec<(Option<String>, Option<Value>)> {
        if let Some(media) = preferred_media(response) {
            let named = named_examples(self.spec, media);
            if !named.is_empty() {
                return named.into_iter().map(|(name, v)| (Some(name), Some(v))).collect();
            }
            if let Some(example) = media.get("example") {
                return vec![(None, Some(example.clone()))];
            }
            if let Some(schema) = media.get("schema") {
                return vec![(None, Some(self.synthesizer.synthesize(schema)))];
            }
            return vec![(None, None)];
        }

        // Swagger 2: mime-keyed `examples`, or a bare `schema`.
        if let Some(example) = response.get("examples").and_then(|e| e.get(JSON_MEDIA_TYPE)) {
            return vec![(None, Some(example.clone()))];
        }
        let body = response
            .get("schema")
            .map(|schema| self.synthesizer.synthesize(schema));
        vec![(None, body)]
    }
}

/// The JSON media entry of a `content` map, or its first entry.
fn preferred_media(holder: &Value) -> Option<&Value> {
    let content = holder.get("content")?.as_object()?;
    content
        .get(JSON_MEDIA_TYPE)
        .or_else(|| content.values().next())
}

/// `examples` of a media object as `(name, value)` pairs, following `$ref`s.
fn named_examples(spec: &InterfaceSpec, media: &Value) -> Vec<(String, Value)> {
    media
        .get("examples")
        .and_then(Value::as_object)
        .into_iter()
        .flatten()
        .filter_map(|(name, example)| {
            let example = spec.resolve(example);
            example
                .get("value")
                .map(|value| (name.clone(), value.clone()))
        })
        .collect()
}

/// Standard reason phrase for common status codes.
pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        301 => "Moved Permanently",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        409 => "Conflict",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "",
    }
}
