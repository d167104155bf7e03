//! Collection browsing.

use clap::Subcommand;

use shopfront_storefront::error::AppError;
use shopfront_storefront::state::AppState;

use crate::output::{Output, print_product_line};

#[derive(Subcommand)]
pub enum CollectionsAction {
    /// List collections
    List {
        #[arg(short, long, default_value_t = 20)]
        first: i64,
        #[arg(long)]
        after: Option<String>,
    },
    /// Show a collection and a page of its products
    Show {
        handle: String,
        #[arg(short, long, default_value_t = 20)]
        first: i64,
        #[arg(long)]
        after: Option<String>,
    },
}

pub async fn run(state: &AppState, action: CollectionsAction, out: Output) -> Result<(), AppError> {
    let catalog = super::catalog(state)?;

    match action {
        CollectionsAction::List { first, after } => {
            let page = catalog.collections(first, after).await?;
            out.emit(&page, |page| {
                for collection in &page.collections {
                    println!("{:<32} {}", collection.handle, collection.title);
                }
                if let (true, Some(cursor)) =
                    (page.page_info.has_next_page, &page.page_info.end_cursor)
                {
                    println!();
                    println!("More: --after {cursor}");
                }
            });
        }
        CollectionsAction::Show {
            handle,
            first,
            after,
        } => {
            let collection = catalog.collection_by_handle(&handle, first, after).await?;
            out.emit(&collection, |collection| {
                println!("{}", collection.title);
                if !collection.description.is_empty() {
                    println!("{}", collection.description);
                }
                println!();
                for product in &collection.products {
                    print_product_line(product);
                }
                if let Some(cursor) = collection
                    .products_page_info
                    .as_ref()
                    .filter(|p| p.has_next_page)
                    .and_then(|p| p.end_cursor.as_ref())
                {
                    println!();
                    println!("More: --after {cursor}");
                }
            });
        }
    }
    Ok(())
}
