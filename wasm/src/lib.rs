use action_graph::{
    EngineKind, LayoutConfig, Orientation, RenderConfig, Theme, build_scene, parse_document,
    render_svg,
};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActionGraphOptions {
    orientation: Option<String>,
    engine: Option<EngineKind>,
    theme: Option<String>,
}

fn layout_config(options: &ActionGraphOptions) -> LayoutConfig {
    LayoutConfig {
        engine: options.engine.unwrap_or_default(),
        ..LayoutConfig::default()
    }
}

fn parse_options(options_json: Option<String>) -> Result<ActionGraphOptions, JsValue> {
    match options_json {
        Some(raw) => serde_json::from_str::<ActionGraphOptions>(&raw)
            .map_err(|error| JsValue::from_str(&error.to_string())),
        None => Ok(ActionGraphOptions::default()),
    }
}

fn scene_json(document_json: &str, options: &ActionGraphOptions) -> Result<String, String> {
    let mut document = parse_document(document_json).map_err(|error| error.to_string())?;
    if let Some(token) = options.orientation.as_deref() {
        document.graph.orientation = Orientation::from_token(token);
    }
    let scene = build_scene(&document, &layout_config(options)).map_err(|error| error.to_string())?;
    serde_json::to_string(&scene).map_err(|error| error.to_string())
}

/// Lay out a graph document and return the render scene as JSON.
#[wasm_bindgen]
pub fn compute_action_graph(document_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = parse_options(options_json)?;
    scene_json(document_json, &options).map_err(|error| JsValue::from_str(&error))
}

/// Lay out a graph document and return a static SVG preview.
#[wasm_bindgen]
pub fn render_action_graph_svg(document_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = parse_options(options_json)?;
    let mut document =
        parse_document(document_json).map_err(|error| JsValue::from_str(&error.to_string()))?;
    if let Some(token) = options.orientation.as_deref() {
        document.graph.orientation = Orientation::from_token(token);
    }
    let scene = build_scene(&document, &layout_config(&options))
        .map_err(|error| JsValue::from_str(&error.to_string()))?;
    let theme = if options.theme.as_deref() == Some("dark") {
        Theme::dark()
    } else {
        Theme::slate()
    };
    Ok(render_svg(&scene, &theme, &RenderConfig::default()))
}

#[cfg(test)]
mod tests {
    use crate::{ActionGraphOptions, scene_json};

    #[test]
    fn computes_scene_with_orientation_override() {
        let document = r#"{
            nodes: [
                { id: 'a', label: 'Fetch', time: 1000 },
                { id: 'b', label: 'Total', isCalculated: true },
            ],
            edges: [{ fromNodeID: 'a', toNodeID: 'b' }],
        }"#;
        let options = ActionGraphOptions {
            orientation: Some("LR".to_string()),
            ..ActionGraphOptions::default()
        };
        let json = scene_json(document, &options).expect("scene should build");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["orientation"], "LR");
        assert_eq!(value["nodes"][1]["data"]["time"], 1000.0);
        assert_eq!(value["nodes"][0]["sourcePosition"], "right");
    }
}
