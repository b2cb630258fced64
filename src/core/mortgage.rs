use thiserror::Error;
use crate::models::{AmortizationYear, LoanParameters, MonthlyBreakdown, MortgageResult};

/// Down payments below this share of the price carry mortgage insurance
pub const PMI_THRESHOLD_PCT: f64 = 20.0;

/// Longest term the engine will amortize
pub const MAX_TERM_YEARS: u32 = 50;

/// Allowed disagreement between the down payment amount and percentage, in currency units
const DOWN_PAYMENT_TOLERANCE: f64 = 0.01;

/// Reasons a loan is rejected before any arithmetic runs
#[derive(Debug, Error, PartialEq)]
pub enum MortgageError {
    #[error("Price must be a positive number, got {0}")]
    InvalidPrice(f64),

    #[error("Term must be between 1 and 50 years, got {0}")]
    InvalidTerm(u32),

    #[error("Down payment must be a non-negative number, got {0}")]
    InvalidDownPayment(f64),

    #[error("Down payment {down_payment} must be less than price {price}")]
    DownPaymentTooLarge { down_payment: f64, price: f64 },

    #[error("Down payment {amount} does not match {pct}% of price")]
    InconsistentDownPayment { amount: f64, pct: f64 },

    #[error("{field} must be a non-negative number, got {value}")]
    NegativeRate { field: &'static str, value: f64 },

    #[error("Loan parameters overflow the payment calculation")]
    NonFiniteResult,
}

fn validate(params: &LoanParameters) -> Result<(), MortgageError> {
    if !params.price.is_finite() || params.price <= 0.0 {
        return Err(MortgageError::InvalidPrice(params.price));
    }

    if params.term_years == 0 || params.term_years > MAX_TERM_YEARS {
        return Err(MortgageError::InvalidTerm(params.term_years));
    }

    if !params.down_payment.is_finite() || params.down_payment < 0.0 {
        return Err(MortgageError::InvalidDownPayment(params.down_payment));
    }

    if params.down_payment >= params.price {
        return Err(MortgageError::DownPaymentTooLarge {
            down_payment: params.down_payment,
            price: params.price,
        });
    }

    let rates = [
        ("annual_rate_pct", params.annual_rate_pct),
        ("tax_rate_pct", params.tax_rate_pct),
        ("insurance_rate_pct", params.insurance_rate_pct),
        ("pmi_rate_pct", params.pmi_rate_pct),
        ("down_payment_pct", params.down_payment_pct),
    ];
    for (field, value) in rates {
        if !value.is_finite() || value < 0.0 {
            return Err(MortgageError::NegativeRate { field, value });
        }
    }

    let implied = params.price * params.down_payment_pct / 100.0;
    if (implied - params.down_payment).abs() > DOWN_PAYMENT_TOLERANCE {
        return Err(MortgageError::InconsistentDownPayment {
            amount: params.down_payment,
            pct: params.down_payment_pct,
        });
    }

    Ok(())
}

/// Fixed-rate monthly principal and interest.
///
/// A zero rate degenerates to straight-line repayment, `principal / n`.
#[inline]
pub fn monthly_payment(principal: f64, monthly_rate: f64, num_payments: u32) -> f64 {
    let n = num_payments as f64;
    if monthly_rate <= 0.0 {
        return principal / n;
    }

    let growth = (1.0 + monthly_rate).powf(n);
    if growth - 1.0 <= 0.0 {
        // rate too small to register in f64
        return principal / n;
    }

    principal * monthly_rate * growth / (growth - 1.0)
}

/// Compute the monthly breakdown and the yearly amortization schedule.
///
/// The schedule runs month by month and stops as soon as the balance is
/// paid off. The last payment clears whatever floating point residue is
/// left, so the final reported balance is exactly zero.
pub fn compute_mortgage(params: &LoanParameters) -> Result<MortgageResult, MortgageError> {
    validate(params)?;

    let principal = params.loan_amount();
    let monthly_rate = params.annual_rate_pct / 100.0 / 12.0;
    let num_payments = params.term_years * 12;

    let payment = monthly_payment(principal, monthly_rate, num_payments);
    if !payment.is_finite() {
        return Err(MortgageError::NonFiniteResult);
    }

    let property_tax = params.price * params.tax_rate_pct / 100.0 / 12.0;
    let insurance = params.price * params.insurance_rate_pct / 100.0 / 12.0;
    let pmi = if params.down_payment_pct < PMI_THRESHOLD_PCT {
        principal * params.pmi_rate_pct / 100.0 / 12.0
    } else {
        0.0
    };

    let monthly = MonthlyBreakdown {
        principal_and_interest: payment,
        property_tax,
        insurance,
        pmi,
        total: payment + property_tax + insurance + pmi,
    };

    let mut schedule = Vec::with_capacity(params.term_years as usize);
    let mut balance = principal;
    let mut total_paid = 0.0;
    let mut month = 0u32;

    'years: for year in 1..=params.term_years {
        let mut principal_paid = 0.0;
        let mut interest_paid = 0.0;

        for _ in 0..12 {
            month += 1;
            let interest = balance * monthly_rate;
            let mut principal_portion = payment - interest;
            if principal_portion > balance || month == num_payments {
                principal_portion = balance;
            }

            balance -= principal_portion;
            principal_paid += principal_portion;
            interest_paid += interest;
            total_paid += principal_portion + interest;

            if balance <= 0.0 {
                schedule.push(AmortizationYear {
                    year,
                    principal_paid,
                    interest_paid,
                    remaining_balance: 0.0,
                });
                break 'years;
            }
        }

        schedule.push(AmortizationYear {
            year,
            principal_paid,
            interest_paid,
            remaining_balance: balance,
        });
    }

    tracing::debug!(
        "Computed mortgage: principal={:.2}, payment={:.2}, years={}",
        principal,
        payment,
        schedule.len()
    );

    Ok(MortgageResult {
        loan_amount: principal,
        num_payments,
        monthly,
        schedule,
        total_interest: total_paid - principal,
        total_paid,
    })
}
