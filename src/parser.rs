use crate::error::Result;
use crate::ir::GraphDocument;

/// Parse a graph document exported from the page builder.
///
/// Strict JSON is tried first; JSON5 covers hand-edited exports with
/// comments, unquoted keys and trailing commas.
pub fn parse_document(input: &str) -> Result<GraphDocument> {
    if let Ok(document) = serde_json::from_str::<GraphDocument>(input) {
        return Ok(document);
    }
    Ok(json5::from_str::<GraphDocument>(input)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Orientation;

    #[test]
    fn parses_strict_json() {
        let document = parse_document(
            r##"{
                "graph": {"orientation": "LR", "backgroundColor": "#fff"},
                "height": 400,
                "nodes": [{"id": "a", "label": "A", "time": 10}],
                "edges": []
            }"##,
        )
        .unwrap();
        assert_eq!(document.graph.orientation, Orientation::LeftRight);
        assert_eq!(document.graph.background_color, "#fff");
        assert_eq!(document.height, 400.0);
        assert_eq!(document.nodes.len(), 1);
    }

    #[test]
    fn parses_json5_with_comments() {
        let document = parse_document(
            r#"{
                // exported from the CMS
                nodes: [
                    { id: 'a', label: 'Checkout', time: 1500, },
                    { id: 'b', label: 'Total', isCalculated: true },
                ],
                edges: [{ fromNodeID: 'a', toNodeID: 'b', autoLayout: true }],
            }"#,
        )
        .unwrap();
        assert_eq!(document.graph.orientation, Orientation::TopBottom);
        assert_eq!(document.height, 700.0);
        assert!(document.nodes[1].is_calculated);
        assert_eq!(document.edges[0].to, "b");
    }

    #[test]
    fn reports_garbage() {
        let err = parse_document("nodes: [").unwrap_err();
        assert!(err.to_string().starts_with("invalid graph document"));
    }
}
