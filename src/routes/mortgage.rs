use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::config::MortgageSettings;
use crate::core::compute_mortgage;
use crate::models::{ErrorResponse, LoanParameters, MortgageRequest};
use crate::routes::validation_error;

/// Configure mortgage calculator routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/mortgage/calculate", web::post().to(calculate));
}

/// Turn a request into one consistent loan snapshot.
///
/// Whichever down payment view the caller sent is the source; the other is
/// derived from it. When both are sent they pass through untouched and the
/// engine rejects them if they disagree.
pub fn loan_parameters(req: &MortgageRequest, defaults: &MortgageSettings) -> LoanParameters {
    let base = match (req.down_payment, req.down_payment_pct) {
        (Some(amount), Some(pct)) => LoanParameters {
            down_payment_pct: pct,
            ..LoanParameters::with_down_payment_amount(req.price, amount, req.annual_rate_pct, req.term_years)
        },
        (Some(amount), None) => {
            LoanParameters::with_down_payment_amount(req.price, amount, req.annual_rate_pct, req.term_years)
        }
        (None, Some(pct)) => {
            LoanParameters::with_down_payment_pct(req.price, pct, req.annual_rate_pct, req.term_years)
        }
        (None, None) => LoanParameters::with_down_payment_amount(req.price, 0.0, req.annual_rate_pct, req.term_years),
    };

    base.escrow(
        req.tax_rate_pct.unwrap_or(defaults.tax_rate_pct),
        req.insurance_rate_pct.unwrap_or(defaults.insurance_rate_pct),
    )
    .pmi(req.pmi_rate_pct.unwrap_or(defaults.pmi_rate_pct))
}

/// Mortgage calculator
///
/// POST /api/v1/mortgage/calculate
///
/// Request body:
/// ```json
/// {
///   "price": 150000,
///   "downPaymentPct": 20,
///   "annualRatePct": 12.5,
///   "termYears": 20
/// }
/// ```
async fn calculate(
    defaults: web::Data<MortgageSettings>,
    req: web::Json<MortgageRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let params = loan_parameters(&req, &defaults);

    match compute_mortgage(&params) {
        Ok(result) => {
            tracing::debug!(
                "Mortgage for price {}: {:.2}/month over {} years",
                params.price,
                result.monthly.total,
                params.term_years
            );
            HttpResponse::Ok().json(result)
        }
        Err(e) => {
            tracing::info!("Rejected mortgage calculation: {}", e);
            HttpResponse::UnprocessableEntity().json(ErrorResponse::new("Invalid loan parameters", e.to_string(), 422))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use crate::models::MortgageResult;

    fn create_request(down_payment: Option<f64>, down_payment_pct: Option<f64>) -> MortgageRequest {
        MortgageRequest {
            price: 200_000.0,
            down_payment,
            down_payment_pct,
            annual_rate_pct: 6.0,
            term_years: 30,
            tax_rate_pct: None,
            insurance_rate_pct: Some(0.0),
            pmi_rate_pct: None,
        }
    }

    #[core::prelude::v1::test]
    fn test_parameters_from_amount() {
        let params = loan_parameters(&create_request(Some(50_000.0), None), &MortgageSettings::default());

        assert!((params.down_payment_pct - 25.0).abs() < 1e-9);
        assert_eq!(params.tax_rate_pct, 1.2);
        assert_eq!(params.insurance_rate_pct, 0.0);
    }

    #[core::prelude::v1::test]
    fn test_parameters_from_pct() {
        let params = loan_parameters(&create_request(None, Some(10.0)), &MortgageSettings::default());
        assert!((params.down_payment - 20_000.0).abs() < 1e-9);
    }

    #[core::prelude::v1::test]
    fn test_parameters_without_down_payment() {
        let params = loan_parameters(&create_request(None, None), &MortgageSettings::default());
        assert_eq!(params.down_payment, 0.0);
        assert_eq!(params.down_payment_pct, 0.0);
    }

    async fn post(body: serde_json::Value) -> actix_web::dev::ServiceResponse {
        let app = test::init_service(
            App::new()
                .configure(|cfg| crate::routes::configure_app_data(cfg, MortgageSettings::default()))
                .service(web::scope("/api/v1").configure(configure)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/mortgage/calculate")
            .set_json(body)
            .to_request();
        test::call_service(&app, req).await
    }

    #[actix_web::test]
    async fn test_calculate_endpoint() {
        let resp = post(serde_json::json!({
            "price": 150000,
            "downPaymentPct": 20,
            "annualRatePct": 12.5,
            "termYears": 20
        }))
        .await;

        assert_eq!(resp.status(), 200);
        let result: MortgageResult = test::read_body_json(resp).await;
        assert_eq!(result.monthly.pmi, 0.0);
        assert!(result.schedule.len() <= 20);
    }

    #[actix_web::test]
    async fn test_inconsistent_down_payment_is_unprocessable() {
        let resp = post(serde_json::json!({
            "price": 150000,
            "downPayment": 10000,
            "downPaymentPct": 20,
            "annualRatePct": 5,
            "termYears": 30
        }))
        .await;

        assert_eq!(resp.status(), 422);
    }

    #[actix_web::test]
    async fn test_down_payment_at_price_is_unprocessable() {
        let resp = post(serde_json::json!({
            "price": 150000,
            "downPayment": 150000,
            "annualRatePct": 5,
            "termYears": 30
        }))
        .await;

        assert_eq!(resp.status(), 422);
    }

    #[actix_web::test]
    async fn test_invalid_request_shape() {
        let resp = post(serde_json::json!({
            "price": -1,
            "annualRatePct": 5,
            "termYears": 30
        }))
        .await;
        assert_eq!(resp.status(), 400);

        let resp = post(serde_json::json!({"price": "lots"})).await;
        assert_eq!(resp.status(), 400);
    }
}
