use crate::server::api;
use crate::settings::Settings;

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn to_http_string(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status_code,
            self.status_text,
            self.content_type,
            self.body.len(),
            self.body
        )
    }

    fn json(body: String) -> Self {
        Self {
            status_code: 200,
            status_text: "OK",
            content_type: "application/json",
            body,
        }
    }
}

pub fn route_request(method: &str, path: &str, body: &str, settings: &Settings) -> HttpResponse {
    let path = path.split('?').next().unwrap_or(path);
    match (method, path) {
        ("GET", "/") => HttpResponse {
            status_code: 200,
            status_text: "OK",
            content_type: "text/plain; charset=utf-8",
            body: usage_text(),
        },
        ("GET", "/api/health") => match api::health_payload() {
            Ok(payload) => HttpResponse::json(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("POST", "/api/exact") => payload_response(api::exact_payload(body)),
        ("POST", "/api/monte-carlo") => payload_response(api::monte_carlo_payload(body, settings)),
        _ => error_response(404, "Not Found", "Route not found"),
    }
}

fn payload_response(result: Result<String, api::PayloadError>) -> HttpResponse {
    match result {
        Ok(payload) => HttpResponse::json(payload),
        Err(err @ (api::PayloadError::Parse(_) | api::PayloadError::Validation(_))) => {
            error_response(400, "Bad Request", &err.to_string())
        }
        Err(err @ api::PayloadError::Engine(_)) => {
            tracing::error!(%err, "statistics run failed");
            error_response(500, "Internal Server Error", &err.to_string())
        }
    }
}

fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}

fn usage_text() -> String {
    "antietam battle odds API

GET  /api/health
POST /api/exact        {\"attacker_size\": 5, \"defender_size\": 5, ...}
POST /api/monte-carlo  {\"attacker_size\": 5, \"defender_size\": 5, \"trials_exponent\": 14, \"seed\": 7}

Battle fields (all optional, default false/0):
  resource_or_capital fort_present interception defender_leader_present
  attacker_size defender_size attacker_leader_drm defender_leader_drm
  attacker_elites defender_elites attacker_out_of_supply defender_out_of_supply amphibious
"
    .to_string()
}
