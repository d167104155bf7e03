//! Customer account operations over the Storefront API.

use async_trait::async_trait;
use tracing::{instrument, warn};

use shopfront_core::Email;

use crate::shopify::ShopifyError;
use crate::shopify::api::CustomerApi;
use crate::shopify::types::{
    Customer, CustomerAccessToken, CustomerCreateInput, MailingAddress, Order,
};

use super::StorefrontClient;
use super::conversions::{convert_address, convert_customer, convert_order, user_errors_to_error};
use super::queries::{
    CustomerAccessTokenCreate, CustomerAccessTokenDelete, CustomerCreate, CustomerVariables,
    GetCustomer, GetCustomerAddresses, GetCustomerOrders, customer_access_token_create,
    customer_access_token_delete, customer_create,
};

fn customer_variables(access_token: &str, first: Option<i64>) -> CustomerVariables {
    CustomerVariables {
        customer_access_token: access_token.to_string(),
        first,
    }
}

#[async_trait]
impl CustomerApi for StorefrontClient {
    #[instrument(skip(self, email, password), fields(email_domain = %email.domain()))]
    async fn create_access_token(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<CustomerAccessToken, ShopifyError> {
        let variables = customer_access_token_create::Variables {
            input: customer_access_token_create::CustomerAccessTokenCreateInput {
                email: email.to_string(),
                password: password.to_string(),
            },
        };

        let data = self.execute::<CustomerAccessTokenCreate>(variables).await?;
        let payload = data
            .customer_access_token_create
            .ok_or_else(|| ShopifyError::message("Failed to create access token"))?;

        if let Some(err) = user_errors_to_error(payload.customer_user_errors) {
            return Err(err);
        }

        // Shopify returns a null token with no errors for bad credentials
        payload
            .customer_access_token
            .ok_or_else(|| ShopifyError::Unauthorized("Invalid email or password".to_string()))
    }

    #[instrument(skip_all)]
    async fn delete_access_token(&self, access_token: &str) -> Result<(), ShopifyError> {
        let data = self
            .execute::<CustomerAccessTokenDelete>(customer_access_token_delete::Variables {
                customer_access_token: access_token.to_string(),
            })
            .await?;

        let payload = data
            .customer_access_token_delete
            .ok_or_else(|| ShopifyError::message("Failed to delete access token"))?;

        if let Some(err) = user_errors_to_error(payload.user_errors) {
            return Err(err);
        }

        if payload.deleted_access_token.is_none() {
            warn!("Access token was not deleted (already expired?)");
        }

        Ok(())
    }

    #[instrument(skip(self, input), fields(email_domain = %input.email.domain()))]
    async fn create_customer(&self, input: &CustomerCreateInput) -> Result<Customer, ShopifyError> {
        let data = self
            .execute::<CustomerCreate>(customer_create::Variables {
                input: input.clone(),
            })
            .await?;

        let payload = data
            .customer_create
            .ok_or_else(|| ShopifyError::message("Failed to create customer"))?;

        if let Some(err) = user_errors_to_error(payload.customer_user_errors) {
            return Err(err);
        }

        payload
            .customer
            .map(convert_customer)
            .ok_or_else(|| ShopifyError::message("Failed to create customer"))
    }

    #[instrument(skip_all)]
    async fn customer(&self, access_token: &str) -> Result<Option<Customer>, ShopifyError> {
        let data = self
            .execute::<GetCustomer>(customer_variables(access_token, None))
            .await?;

        Ok(data.customer.map(convert_customer))
    }

    #[instrument(skip(self, access_token))]
    async fn orders(
        &self,
        access_token: &str,
        first: i64,
    ) -> Result<Option<Vec<Order>>, ShopifyError> {
        let data = self
            .execute::<GetCustomerOrders>(customer_variables(access_token, Some(first)))
            .await?;

        Ok(data
            .customer
            .map(|c| c.orders.nodes.into_iter().map(convert_order).collect()))
    }

    #[instrument(skip(self, access_token))]
    async fn addresses(
        &self,
        access_token: &str,
        first: i64,
    ) -> Result<Option<Vec<MailingAddress>>, ShopifyError> {
        let data = self
            .execute::<GetCustomerAddresses>(customer_variables(access_token, Some(first)))
            .await?;

        Ok(data
            .customer
            .map(|c| c.addresses.nodes.into_iter().map(convert_address).collect()))
    }
}
