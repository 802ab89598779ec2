use super::{ApiRequest, ApiResponse, HttpTransport, HttpUtils};
use crate::domain::{
    alerts::{Alert, AlertOwner, NewAlert},
    errors::{ApiResult, AppError},
    logging::{LogComponent, Logger, get_logger},
    market::{AlertList, AnalysisSnapshot, FibonacciLevels, RealtimeQuote, RecentAlert, Symbol, Timeframe},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<serde_json::Value>,
}

/// Typed access to the analytics API over any [`HttpTransport`].
#[derive(Clone)]
pub struct ApiClient<T> {
    transport: T,
    user_id: String,
}

impl<T: HttpTransport> ApiClient<T> {
    pub fn new(transport: T, user_id: impl Into<String>) -> Self {
        Self { transport, user_id: user_id.into() }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn realtime_path(symbol: &Symbol) -> String {
        format!("/api/realtime/{}", symbol.value())
    }

    pub fn analyze_path(symbol: &Symbol, timeframe: Timeframe) -> String {
        HttpUtils::build_url_with_params(
            "/api/analyze",
            &[("symbol", symbol.value()), ("timeframe", timeframe.as_query_value())],
        )
    }

    pub fn fibonacci_path(symbol: &Symbol) -> String {
        format!("/api/fibonacci/{}", symbol.value())
    }

    pub fn symbol_alerts_path(symbol: &Symbol) -> String {
        format!("/api/alerts/{}", symbol.value())
    }

    pub fn user_alerts_path(user_id: &str) -> String {
        format!("/api/alerts/user/{}", HttpUtils::url_encode(user_id))
    }

    pub async fn realtime(&self, symbol: &Symbol) -> ApiResult<RealtimeQuote> {
        self.fetch_json(ApiRequest::get(Self::realtime_path(symbol))).await
    }

    pub async fn analyze(&self, symbol: &Symbol, timeframe: Timeframe) -> ApiResult<AnalysisSnapshot> {
        self.fetch_json(ApiRequest::get(Self::analyze_path(symbol, timeframe))).await
    }

    pub async fn fibonacci(&self, symbol: &Symbol) -> ApiResult<FibonacciLevels> {
        self.fetch_json(ApiRequest::get(Self::fibonacci_path(symbol))).await
    }

    pub async fn symbol_alerts(&self, symbol: &Symbol) -> ApiResult<Vec<RecentAlert>> {
        let list: AlertList<RecentAlert> =
            self.fetch_json(ApiRequest::get(Self::symbol_alerts_path(symbol))).await?;
        Ok(list.alerts)
    }

    pub async fn user_alerts(&self) -> ApiResult<Vec<Alert>> {
        let list: AlertList<Alert> =
            self.fetch_json(ApiRequest::get(Self::user_alerts_path(&self.user_id))).await?;
        Ok(list.alerts)
    }

    pub async fn create_alert(&self, alert: &NewAlert) -> ApiResult<()> {
        let body = Self::encode(alert)?;
        self.expect_success(ApiRequest::post("/api/alerts/create", body)).await
    }

    pub async fn delete_alert(&self, id: i64) -> ApiResult<()> {
        let body = Self::encode(&AlertOwner { user_id: self.user_id.clone() })?;
        self.expect_success(ApiRequest::delete(format!("/api/alerts/{}", id), body)).await
    }

    async fn fetch_json<R: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<R> {
        let path = request.path.clone();
        let response = self.checked(request).await?;
        serde_json::from_str(&response.body).map_err(|e| {
            get_logger().error(
                LogComponent::Infrastructure("ApiClient"),
                &format!("❌ Malformed JSON from {}: {}", path, e),
            );
            AppError::Parse(format!("{}: {}", path, e))
        })
    }

    async fn expect_success(&self, request: ApiRequest) -> ApiResult<()> {
        self.checked(request).await.map(|_| ())
    }

    /// Sends and maps a non-2xx status to `AppError::Http`, keeping the
    /// server's `{error}` string when the body has one.
    async fn checked(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let response = self.transport.send(request).await?;
        if response.is_success() {
            return Ok(response);
        }
        Err(AppError::Http { status: response.status, message: Self::error_message(&response.body) })
    }

    fn error_message(body: &str) -> Option<String> {
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        match parsed.error? {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    fn encode<B: Serialize>(body: &B) -> ApiResult<String> {
        serde_json::to_string(body).map_err(|e| AppError::Parse(format!("Failed to serialize body: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http::Method;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    struct Scripted {
        replies: RefCell<VecDeque<Result<ApiResponse, AppError>>>,
        seen: RefCell<Vec<ApiRequest>>,
    }

    impl Scripted {
        fn new(replies: Vec<Result<ApiResponse, AppError>>) -> Self {
            Self { replies: RefCell::new(replies.into()), seen: RefCell::new(Vec::new()) }
        }
    }

    impl HttpTransport for &Scripted {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, AppError> {
            self.seen.borrow_mut().push(request);
            self.replies.borrow_mut().pop_front().unwrap_or_else(|| Ok(ApiResponse::new(200, "{}")))
        }
    }

    #[test]
    fn paths_follow_the_endpoint_table() {
        let btc = Symbol::from("BTC/USDT");
        assert_eq!(ApiClient::<&Scripted>::realtime_path(&btc), "/api/realtime/BTC/USDT");
        assert_eq!(
            ApiClient::<&Scripted>::analyze_path(&btc, Timeframe::FourHours),
            "/api/analyze?symbol=BTC/USDT&timeframe=4h"
        );
        assert_eq!(ApiClient::<&Scripted>::fibonacci_path(&btc), "/api/fibonacci/BTC/USDT");
        assert_eq!(ApiClient::<&Scripted>::symbol_alerts_path(&btc), "/api/alerts/BTC/USDT");
        assert_eq!(ApiClient::<&Scripted>::user_alerts_path("web_user"), "/api/alerts/user/web_user");
    }

    #[test]
    fn error_body_becomes_http_error_message() {
        let transport = Scripted::new(vec![Ok(ApiResponse::new(400, r#"{"error":"Invalid alert type"}"#))]);
        let client = ApiClient::new(&transport, "web_user");
        let err = block_on(client.realtime(&Symbol::default())).unwrap_err();
        assert_eq!(err, AppError::Http { status: 400, message: Some("Invalid alert type".into()) });
    }

    #[test]
    fn non_json_error_body_has_no_message() {
        let transport = Scripted::new(vec![Ok(ApiResponse::new(502, "<html>Bad Gateway</html>"))]);
        let client = ApiClient::new(&transport, "web_user");
        let err = block_on(client.user_alerts()).unwrap_err();
        assert_eq!(err, AppError::Http { status: 502, message: None });
    }

    #[test]
    fn malformed_success_body_is_a_parse_error() {
        let transport = Scripted::new(vec![Ok(ApiResponse::new(200, "not json"))]);
        let client = ApiClient::new(&transport, "web_user");
        let err = block_on(client.analyze(&Symbol::default(), Timeframe::OneDay)).unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }

    #[test]
    fn delete_scopes_by_user() {
        let transport = Scripted::new(vec![Ok(ApiResponse::new(200, r#"{"success":true}"#))]);
        let client = ApiClient::new(&transport, "web_user");
        block_on(client.delete_alert(42)).unwrap();
        let seen = transport.seen.borrow();
        assert_eq!(seen[0].method, Method::Delete);
        assert_eq!(seen[0].path, "/api/alerts/42");
        assert_eq!(seen[0].body.as_deref(), Some(r#"{"user_id":"web_user"}"#));
    }

    #[test]
    fn transport_failures_pass_through() {
        let transport = Scripted::new(vec![Err(AppError::Network("offline".into()))]);
        let client = ApiClient::new(&transport, "web_user");
        let err = block_on(client.fibonacci(&Symbol::default())).unwrap_err();
        assert_eq!(err, AppError::Network("offline".into()));
    }
}
