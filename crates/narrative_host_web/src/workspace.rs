//! JSON-RPC client for the workspace service.

use std::rc::Rc;

use narrative_host::{ObjectInfo, ServiceError, StagingFuture, TokenSource, WorkspaceService};
use reqwest::Client;
use serde_json::{json, Value};

use crate::http::authorize;

const GET_OBJECT_INFO_METHOD: &str = "Workspace.get_object_info_new";

#[derive(Clone)]
/// Workspace client speaking JSON-RPC 1.1.
pub struct HttpWorkspaceService {
    client: Client,
    url: String,
    token: Rc<dyn TokenSource>,
}

impl HttpWorkspaceService {
    /// Creates a client for the workspace endpoint at `url`.
    pub fn new(url: impl Into<String>, token: Rc<dyn TokenSource>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            token,
        }
    }
}

/// Request body for `get_object_info_new` on one reference.
pub(crate) fn object_info_request(reference: &str) -> Value {
    json!({
        "version": "1.1",
        "method": GET_OBJECT_INFO_METHOD,
        "id": "narrative-staging",
        "params": [{ "objects": [{ "ref": reference }] }],
    })
}

/// Extracts the first object-info tuple from a JSON-RPC response body.
///
/// Tuple layout: `[objid, name, type, save_date, version, saved_by, wsid, ...]`.
pub(crate) fn parse_object_info(body: &Value) -> Result<ObjectInfo, ServiceError> {
    if let Some(error) = body.get("error").filter(|error| !error.is_null()) {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown workspace error");
        return Err(ServiceError::Rpc(message.to_string()));
    }

    let info = body
        .pointer("/result/0/0")
        .and_then(Value::as_array)
        .ok_or_else(|| ServiceError::Decode("object info missing from response".to_string()))?;
    let text = |idx: usize| info.get(idx).and_then(Value::as_str).map(str::to_string);
    let number = |idx: usize| info.get(idx).and_then(Value::as_u64);

    let name = text(1).ok_or_else(|| ServiceError::Decode("object name missing".to_string()))?;
    let upa = match (number(6), number(0), number(4)) {
        (Some(ws), Some(obj), Some(ver)) => format!("{ws}/{obj}/{ver}"),
        _ => String::new(),
    };
    Ok(ObjectInfo {
        upa,
        name,
        type_string: text(2).unwrap_or_default(),
    })
}

impl WorkspaceService for HttpWorkspaceService {
    fn get_object_info<'a>(
        &'a self,
        reference: &'a str,
    ) -> StagingFuture<'a, Result<ObjectInfo, ServiceError>> {
        Box::pin(async move {
            let request = self
                .client
                .post(self.url.as_str())
                .json(&object_info_request(reference));
            let response = authorize(request, self.token.as_ref())
                .send()
                .await
                .map_err(|err| ServiceError::Transport(err.to_string()))?;
            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|err| ServiceError::Transport(err.to_string()))?;

            // JSON-RPC errors arrive as HTTP 500 with an error object in the body.
            match serde_json::from_str::<Value>(&text) {
                Ok(body) => parse_object_info(&body),
                Err(_) if !status.is_success() => Err(ServiceError::http(status.as_u16(), text)),
                Err(err) => Err(err.into()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn object_info_request_targets_one_reference() {
        let body = object_info_request("1/2/3");
        assert_eq!(body["method"], json!(GET_OBJECT_INFO_METHOD));
        assert_eq!(body["params"][0]["objects"][0]["ref"], json!("1/2/3"));
    }

    #[test]
    fn parse_object_info_reads_first_tuple() {
        let body = json!({
            "version": "1.1",
            "result": [[[2, "reads_lib", "KBaseFile.PairedEndLibrary-2.1", "2017-07-14T02:40:00+0000", 3, "jdoe", 1, "jdoe:narrative_1", "abc", 100, {}]]]
        });
        assert_eq!(
            parse_object_info(&body).expect("info"),
            ObjectInfo {
                upa: "1/2/3".to_string(),
                name: "reads_lib".to_string(),
                type_string: "KBaseFile.PairedEndLibrary-2.1".to_string(),
            }
        );
    }

    #[test]
    fn parse_object_info_surfaces_rpc_errors() {
        let body = json!({
            "version": "1.1",
            "error": {"name": "JSONRPCError", "code": -32500, "message": "Object 2 cannot be accessed"}
        });
        assert_eq!(
            parse_object_info(&body).expect_err("rpc error"),
            ServiceError::Rpc("Object 2 cannot be accessed".to_string())
        );
        assert!(matches!(
            parse_object_info(&json!({"result": []})),
            Err(ServiceError::Decode(_))
        ));
    }
}
