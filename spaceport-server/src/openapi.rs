//! OpenAPI specification for the Spaceport server.

use utoipa::OpenApi;

use spaceport_core::{Ship, ShipDraft, ShipOrder, ShipType};

use crate::routes::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::list_ships,
        crate::routes::count_ships,
        crate::routes::create_ship,
        crate::routes::get_ship,
        crate::routes::update_ship,
        crate::routes::delete_ship,
        crate::routes::openapi_json
    ),
    components(schemas(Ship, ShipDraft, ShipType, ShipOrder, ErrorResponse)),
    tags(
        (name = "ships", description = "Ship records"),
        (name = "system", description = "System endpoints")
    )
)]
/// OpenAPI specification for the Spaceport server.
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::ApiDoc;
    use utoipa::OpenApi;

    #[test]
    fn openapi_includes_expected_paths() {
        let doc = ApiDoc::openapi();
        let paths = doc.paths.paths;

        assert!(paths.contains_key("/rest/ships"));
        assert!(paths.contains_key("/rest/ships/count"));
        assert!(paths.contains_key("/rest/ships/{id}"));
        assert!(paths.contains_key("/rest/openapi.json"));
    }

    #[test]
    fn openapi_registers_ship_schemas() {
        let doc = ApiDoc::openapi();
        let schemas = doc.components.expect("components").schemas;

        for name in ["Ship", "ShipDraft", "ShipType", "ShipOrder", "ErrorResponse"] {
            assert!(schemas.contains_key(name), "missing schema {name}");
        }
    }

    #[test]
    fn count_documents_filter_parameters_only() {
        let doc = serde_json::to_value(ApiDoc::openapi()).expect("openapi json");
        let names = |path: &str| -> Vec<String> {
            doc["paths"][path]["get"]["parameters"]
                .as_array()
                .map(|params| {
                    params
                        .iter()
                        .filter_map(|param| param["name"].as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default()
        };

        let count = names("/rest/ships/count");
        assert!(count.contains(&"minSpeed".to_string()));
        assert!(!count.contains(&"pageNumber".to_string()));
        assert!(!count.contains(&"order".to_string()));

        let list = names("/rest/ships");
        assert!(list.contains(&"minSpeed".to_string()));
        assert!(list.contains(&"pageNumber".to_string()));
    }
}
