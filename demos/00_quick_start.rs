/// quick start - validate a form and derive the implied loan
use mortgage_estimator_rs::{
    calculate_implied_loan, calculate_loan_to_value, closing_costs, parse_amount,
    parse_percentage, validate_purchase_price, validate_repay_rate, validate_total_savings,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // values as typed into the form
    let price = parse_amount(" 150000 ");
    let savings = parse_amount("30000");
    let repay_rate = parse_percentage("2");

    for error in [
        validate_purchase_price(price),
        validate_total_savings(savings, price),
        validate_repay_rate(repay_rate),
    ] {
        if !error.is_empty() {
            println!("invalid input: {error}");
            return Ok(());
        }
    }

    let (Some(price), Some(savings)) = (price, savings) else {
        return Ok(());
    };

    let costs = closing_costs(price, false)?;
    println!("notary:      {:.2}", costs.notary.as_decimal());
    println!("stamp duty:  {:.2}", costs.stamp_duty.as_decimal());
    println!("broker:      {:.2}", costs.broker.as_decimal());

    let loan = calculate_implied_loan(price, savings, false)?;
    let ltv = calculate_loan_to_value(loan, price)?;
    println!("implied loan: {:.2}", loan.as_decimal());
    println!("loan to value: {:.2}%", ltv.as_percentage());

    Ok(())
}
