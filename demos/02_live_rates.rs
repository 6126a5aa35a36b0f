/// live rates - query the real rates service
///
/// Endpoint and timeout come from MORTGAGE_RATES_ENDPOINT and
/// MORTGAGE_RATES_TIMEOUT_SECS (or a .env file).
use mortgage_estimator_rs::{FormInputs, Money, RatesClient, SafeTimeProvider, SubmissionOrchestrator, TimeSource};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let time = SafeTimeProvider::new(TimeSource::System);
    let client = RatesClient::from_env()?;
    println!("rates service: {}", client.endpoint());

    let inputs = FormInputs::default().with_purchase_price(Money::from_major(300_000));
    let mut form = SubmissionOrchestrator::with_inputs(client, inputs);

    if let Some(figures) = form.implied_loan_figures() {
        println!("implied loan:  {:.2}", figures.implied_loan.as_decimal());
        println!("loan to value: {:.2}%", figures.loan_to_value_percent());
    }

    form.submit(&time).await;
    let state = form.state();
    match (state.rates(), state.error_message()) {
        (Some([]), _) => println!("no rates quoted for this loan"),
        (Some(rates), _) => {
            for option in rates {
                println!("{:>2} years: {}", option.term_years, option.borrowing_rate);
            }
        }
        (None, Some(message)) => println!("{message}"),
        (None, None) => println!("submission rejected: {:?}", form.validation()),
    }

    Ok(())
}
