//! Web server for the Growth Cycle Simulator
//!
//! Exposes the simulation as a JSON API:
//!   POST /simulate  - body mirrors the YAML run file
//!   GET  /health    - liveness check

use actix_web::{web, App, HttpResponse, HttpServer, Result};
use clap::Parser;
use growth_cycle_simulator::config::{Config, ConfigError};
use growth_cycle_simulator::ledger::Ledger;
use growth_cycle_simulator::simulation::{CycleProgress, SimulationOutcome, Streak, Summary};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "web-server")]
#[command(about = "JSON API for the growth cycle simulator")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:3000")]
    bind: String,
}

#[derive(Debug, Serialize)]
struct SimResponse {
    outcome: SimulationOutcome,
    summary: Summary,
    streak: Streak,
    progress: Option<CycleProgress>,
    ledger: Ledger,
}

fn bad_request(err: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({ "error": err.to_string() }))
}

async fn run_simulation(req: web::Json<Config>) -> Result<HttpResponse> {
    let plan = match req.plan() {
        Ok(plan) => plan,
        Err(ConfigError::Input(e)) => {
            warn!(error = %e, "rejected simulation request");
            return Ok(bad_request(e));
        }
        Err(e) => return Err(actix_web::error::ErrorInternalServerError(e.to_string())),
    };

    let result = match plan.run() {
        Ok(result) => result,
        Err(e) => return Ok(bad_request(e)),
    };

    // serde_json would write an overflowed balance as null
    if !result.final_balance().is_finite() {
        warn!(operations = result.operations(), "balance overflowed");
        return Ok(HttpResponse::UnprocessableEntity().json(json!({
            "error": "balance overflow: the balance exceeded the largest representable amount",
            "operations": result.operations(),
        })));
    }

    Ok(HttpResponse::Ok().json(SimResponse {
        outcome: result.outcome(),
        summary: result.summary(),
        streak: result.streak(),
        progress: result.progress(),
        ledger: result.ledger,
    }))
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/simulate", web::post().to(run_simulation))
        .route("/health", web::get().to(health));
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    info!(bind = %args.bind, "growth cycle simulator web server starting");

    HttpServer::new(|| App::new().configure(routes))
        .bind(&args.bind)?
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};

    fn body(start: &str, end: &str) -> serde_json::Value {
        json!({
            "simulation": {
                "initial_balance": 200.0,
                "start_date": start,
                "end_date": end,
                "active_weekdays": ["mon", "tue", "thu"]
            },
            "cycle": {
                "gain_rate": "20,00%",
                "loss_rate": "15,00%",
                "gain_days": 2,
                "loss_days": 1,
                "starts_with": "gain"
            }
        })
    }

    #[actix_web::test]
    async fn test_simulate_endpoint() {
        let app = test::init_service(App::new().configure(routes)).await;
        let req = test::TestRequest::post()
            .uri("/simulate")
            .set_json(body("07/08/2025", "13/08/2025"))
            .to_request();
        let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp["outcome"]["status"], "completed");
        assert_eq!(resp["outcome"]["operations"], 3);
        assert_eq!(resp["ledger"].as_array().map(|a| a.len()), Some(3));
        assert_eq!(resp["ledger"][0]["date"], "2025-08-07");
        let final_balance = resp["summary"]["final_balance"].as_f64().unwrap();
        assert!((final_balance - 244.8).abs() < 1e-9);
    }

    #[actix_web::test]
    async fn test_bad_range_is_400() {
        let app = test::init_service(App::new().configure(routes)).await;
        let req = test::TestRequest::post()
            .uri("/simulate")
            .set_json(body("14/08/2025", "07/08/2025"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_no_operations_is_ok() {
        let app = test::init_service(App::new().configure(routes)).await;
        let mut payload = body("07/08/2025", "13/08/2025");
        payload["simulation"]["active_weekdays"] = json!([]);
        let req = test::TestRequest::post()
            .uri("/simulate")
            .set_json(payload)
            .to_request();
        let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["outcome"]["status"], "no_operations");
        assert_eq!(resp["summary"]["final_balance"], 200.0);
    }

    #[actix_web::test]
    async fn test_balance_overflow_is_422() {
        let app = test::init_service(App::new().configure(routes)).await;
        let payload = json!({
            "simulation": {
                "initial_balance": 1000.0,
                "start_date": "01/01/2025",
                "end_date": "01/03/2026",
                "active_weekdays": ["0", "1", "2", "3", "4", "5", "6"]
            },
            "cycle": {
                "gain_rate": "500,00",
                "loss_rate": "0,00",
                "gain_days": 1,
                "loss_days": 0
            }
        });
        let req = test::TestRequest::post()
            .uri("/simulate")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let err: serde_json::Value = test::read_body_json(resp).await;
        assert!(err["error"].as_str().unwrap().contains("overflow"));
        assert!(err.get("summary").is_none());
    }

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(App::new().configure(routes)).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }
}
