//! Catalog browsing.

use clap::{Subcommand, ValueEnum};

use shopfront_storefront::error::AppError;
use shopfront_storefront::shopify::ProductSortKey;
use shopfront_storefront::state::AppState;

use crate::output::{Output, print_product, print_product_line};

#[derive(Subcommand)]
pub enum ProductsAction {
    /// List or search products
    List {
        /// Number of products per page
        #[arg(short, long, default_value_t = 20)]
        first: i64,
        /// Cursor from a previous page
        #[arg(long)]
        after: Option<String>,
        /// Search query
        #[arg(short, long)]
        query: Option<String>,
        /// Sort order
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
        /// Reverse the sort order
        #[arg(long)]
        reverse: bool,
    },
    /// Show one product by handle
    Show { handle: String },
    /// Show products recommended alongside a product
    Recommend { handle: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Title,
    Price,
    BestSelling,
    Newest,
    Relevance,
}

impl From<SortArg> for ProductSortKey {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Title => Self::Title,
            SortArg::Price => Self::Price,
            SortArg::BestSelling => Self::BestSelling,
            SortArg::Newest => Self::CreatedAt,
            SortArg::Relevance => Self::Relevance,
        }
    }
}

pub async fn run(state: &AppState, action: ProductsAction, out: Output) -> Result<(), AppError> {
    let catalog = super::catalog(state)?;

    match action {
        ProductsAction::List {
            first,
            after,
            query,
            sort,
            reverse,
        } => {
            let page = catalog
                .products(first, after, query, sort.map(Into::into), reverse)
                .await?;
            out.emit(&page, |page| {
                if page.products.is_empty() {
                    println!("No products found.");
                }
                for product in &page.products {
                    print_product_line(product);
                }
                if let (true, Some(cursor)) =
                    (page.page_info.has_next_page, &page.page_info.end_cursor)
                {
                    println!();
                    println!("More: --after {cursor}");
                }
            });
        }
        ProductsAction::Show { handle } => {
            let product = catalog.product_by_handle(&handle).await?;
            out.emit(&product, print_product);
        }
        ProductsAction::Recommend { handle } => {
            let product = catalog.product_by_handle(&handle).await?;
            let products = catalog.recommendations(&product.id).await?;
            out.emit(&products, |products| {
                if products.is_empty() {
                    println!("No recommendations for {}.", product.title);
                }
                for product in products {
                    print_product_line(product);
                }
            });
        }
    }
    Ok(())
}
