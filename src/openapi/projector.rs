//! Registry → OpenAPI document.

use std::collections::BTreeMap;

use axum::body::Bytes;

use super::schema::{
    Components, Info, OpenApiDocument, Operation, ParameterObject, PathItem, ResponseObject,
    SchemaObject, OPENAPI_VERSION, VALIDATION_ERROR_DESCRIPTION,
};
use crate::app::{App, Parameter, Route};

/// Build the document for every declared route.
pub fn project(app: &App) -> OpenApiDocument {
    let paths = app
        .routes()
        .map(|route| (route.path().to_string(), path_item(route)))
        .collect();

    OpenApiDocument {
        openapi: OPENAPI_VERSION.to_string(),
        info: Info {
            title: app.title.clone(),
            version: app.version.clone(),
            description: app.description.clone(),
            terms_of_service: app.terms_of_service.clone(),
            contact: app.contact.clone(),
            license: app.license.clone(),
        },
        security: app.security.clone(),
        tags: app.tags.clone(),
        components: Components {
            security_schemes: app.security_schemes.clone(),
        },
        paths,
    }
}

/// Project and serialize in one step.
pub fn render_document(app: &App) -> Result<Bytes, serde_json::Error> {
    serde_json::to_vec(&project(app)).map(Bytes::from)
}

fn path_item(route: &Route) -> PathItem {
    let parameters: Vec<ParameterObject> = route.parameters().iter().map(parameter_object).collect();

    route
        .allowed_methods()
        .iter()
        .map(|method| {
            let operation = Operation {
                description: route.description_text().to_string(),
                tags: route.tag_list().to_vec(),
                parameters: parameters.clone(),
                responses: validation_responses(),
                deprecated: route.is_deprecated(),
            };
            (method.as_str().to_ascii_lowercase(), operation)
        })
        .collect()
}

fn parameter_object(param: &Parameter) -> ParameterObject {
    let mut schema = SchemaObject::default();
    for validator in &param.validators {
        validator.describe(&mut schema);
    }
    ParameterObject {
        name: param.name.clone(),
        location: param.location.as_str().to_string(),
        required: param.is_required(),
        schema,
    }
}

fn validation_responses() -> BTreeMap<String, ResponseObject> {
    let mut responses = BTreeMap::new();
    responses.insert(
        "422".to_string(),
        ResponseObject {
            description: VALIDATION_ERROR_DESCRIPTION.to_string(),
        },
    );
    responses
}
