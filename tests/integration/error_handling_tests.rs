//! Error handling integration tests
//!
//! Verifies the status codes and bodies errors render as, and that
//! internal detail never reaches a caller.

#[cfg(test)]
mod tests {
    use actix_web::ResponseError;
    use actix_web::body::MessageBody;
    use folio_gateway::utils::error::GatewayError;
    use serde_json::Value;

    fn body_of(err: &GatewayError) -> Value {
        let bytes = err
            .error_response()
            .into_body()
            .try_into_bytes()
            .unwrap_or_default();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_client_errors_keep_their_message() {
        let err = GatewayError::bad_request("Project slug may only contain letters");
        assert_eq!(err.status_code().as_u16(), 400);
        assert!(
            body_of(&err)["error"]["message"]
                .as_str()
                .unwrap()
                .contains("Project slug")
        );

        let err = GatewayError::not_found("Project 'x' not found");
        assert_eq!(err.status_code().as_u16(), 404);
        assert_eq!(body_of(&err)["error"]["code"], "NOT_FOUND");
    }

    #[test]
    fn test_rate_limit_maps_to_429() {
        let err = GatewayError::rate_limit("contact");
        assert_eq!(err.status_code().as_u16(), 429);
        assert_eq!(body_of(&err)["error"]["code"], "RATE_LIMIT_EXCEEDED");
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        for err in [
            GatewayError::internal("lock poisoned at src/foo.rs:42"),
            GatewayError::cache("redis://:hunter2@cache:6379 refused"),
            GatewayError::external("upstream said: invalid api key sk-abc"),
        ] {
            let body = body_of(&err).to_string();
            assert!(!body.contains("hunter2"));
            assert!(!body.contains("sk-abc"));
            assert!(!body.contains("src/foo.rs"));
            assert!(body.contains("Something went wrong"));
        }
    }

    #[test]
    fn test_client_error_classification() {
        assert!(GatewayError::validation("bad").is_client_error());
        assert!(GatewayError::not_found("x").is_client_error());
        assert!(!GatewayError::timeout("slow").is_client_error());
        assert!(!GatewayError::internal("x").is_client_error());
    }
}
