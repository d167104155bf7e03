//! Order history commands.

use clap::Subcommand;

use shopfront_storefront::error::AppError;
use shopfront_storefront::state::AppState;

use crate::output::{Output, print_address, print_order, print_order_line};

#[derive(Subcommand)]
pub enum OrdersAction {
    /// List recent orders
    List {
        #[arg(short, long, default_value_t = 10)]
        first: i64,
    },
    /// Show an order by number (1001, #1001)
    Show { reference: String },
    /// List saved addresses
    Addresses {
        #[arg(short, long, default_value_t = 10)]
        first: i64,
    },
}

pub async fn run(state: &AppState, action: OrdersAction, out: Output) -> Result<(), AppError> {
    let orders = state.orders();

    match action {
        OrdersAction::List { first } => {
            let list = orders.orders(first).await?;
            out.emit(&list, |list| {
                if list.is_empty() {
                    println!("No orders yet.");
                }
                for order in list {
                    print_order_line(order);
                }
            });
        }
        OrdersAction::Show { reference } => {
            let order = orders.order(&reference).await?;
            out.emit(&order, print_order);
        }
        OrdersAction::Addresses { first } => {
            let addresses = orders.addresses(first).await?;
            out.emit(&addresses, |addresses| {
                if addresses.is_empty() {
                    println!("No saved addresses.");
                }
                for address in addresses {
                    print_address(address);
                }
            });
        }
    }
    Ok(())
}
