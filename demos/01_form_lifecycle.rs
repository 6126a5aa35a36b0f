/// form lifecycle - submit, invalidate and resubmit against a mock service
use mortgage_estimator_rs::chrono::{TimeZone, Utc};
use mortgage_estimator_rs::{
    Decimal, Money, MockRatesProvider, MortgageError, Rate, RateOption, SafeTimeProvider,
    SubmissionOrchestrator, TimeSource,
};
use rust_decimal_macros::dec;

fn quote(years: &str, borrowing: Decimal, monthly: i64) -> RateOption {
    RateOption {
        term_years: years.to_string(),
        borrowing_rate: Rate::from_percentage(borrowing),
        monthly_rate: Money::from_major(monthly),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    ));

    let provider = MockRatesProvider::new()
        .respond_with(vec![quote("15", dec!(2.5), 123), quote("30", dec!(3), 234)])
        .fail_with(MortgageError::UnexpectedStatus { status: 503 });

    let mut form = SubmissionOrchestrator::new(provider);

    println!("1. submit default form");
    println!("----------------------");
    form.submit(&time).await;
    if let Some(rates) = form.state().rates() {
        for option in rates {
            println!(
                "  {:>2} years: {} borrowing, {} per month",
                option.term_years, option.borrowing_rate, option.monthly_rate
            );
        }
    }

    println!("\n2. edit the price");
    println!("-----------------");
    form.set_purchase_price(Some(Money::from_major(200_000)), &time);
    println!("  state after edit: {:?}", form.state().phase());

    println!("\n3. resubmit (service fails)");
    println!("---------------------------");
    form.submit(&time).await;
    println!("  {}", form.state().error_message().unwrap_or_default());

    println!("\n4. invalid input blocks submission");
    println!("----------------------------------");
    form.set_total_savings(Some(Money::from_major(250_000)), &time);
    for (field, message) in form.validation().errors() {
        println!("  {field:?}: {message}");
    }
    println!("  can submit: {}", form.can_submit());

    println!("\ncurrent view:");
    println!("{}", form.view().to_json_pretty()?);

    Ok(())
}
