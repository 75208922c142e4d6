//! Add-product workflow: form input in, store events out

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{Product, Shop, ShopChanges};
use crate::services::find_shop;
use crate::store::{ShopsSubscription, StoreHandle};
use crate::workflow::{validate_product_form, ProductForm};
use crate::{Result, ShoppingError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Name,
    ShopId,
    PriceUsd,
    DeliveryEstDate,
}

/// Field that receives focus when the form is reset.
pub const AUTO_FOCUSED_FIELD: FormField = FormField::Name;

/// What one successful submission added to the store.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub product: Product,
    pub shop: Shop,
    pub changes: ShopChanges,
}

/// Turns a filled-in product form into a new product and updated shop
/// totals. After a submission the form stays disabled until [`reset`].
///
/// The workflow never touches shared state directly. It reads shops through
/// a subscription and hands validated input to the store, which creates the
/// product and records the `ProductAdded` / `ShopUpdated` events in one step.
///
/// [`reset`]: AddProductWorkflow::reset
pub struct AddProductWorkflow {
    store: StoreHandle,
    shops: ShopsSubscription,
    form: ProductForm,
    submitted: bool,
    disabled: bool,
    focused: Option<FormField>,
}

impl AddProductWorkflow {
    pub fn open(store: &StoreHandle) -> Self {
        Self {
            shops: store.subscribe_shops(),
            store: store.clone(),
            form: ProductForm::default(),
            submitted: false,
            disabled: false,
            focused: Some(AUTO_FOCUSED_FIELD),
        }
    }

    pub fn form(&self) -> &ProductForm { &self.form }
    pub fn is_submitted(&self) -> bool { self.submitted }
    pub fn is_disabled(&self) -> bool { self.disabled }
    pub fn focused(&self) -> Option<FormField> { self.focused }

    /// Replaces the form contents. Rejected while the form is disabled.
    pub fn fill(&mut self, form: ProductForm) -> Result<()> {
        self.ensure_enabled()?;
        self.form = form;
        Ok(())
    }

    pub async fn submit(&mut self) -> Result<Submission> {
        self.ensure_enabled()?;
        let input = validate_product_form(&self.form).into_result()?;
        // Shops are never created or deleted, so the subscribed list is enough
        // to reject an unknown id before going to the store.
        if find_shop(&self.shops.current(), &input.shop_id).is_none() {
            return Err(ShoppingError::ShopNotFound(input.shop_id));
        }

        let submission = self.store.add_product(input).await?;

        self.submitted = true;
        self.disabled = true;
        self.focused = None;
        info!(product_id = %submission.product.id, shop_id = %submission.shop.id, price = %submission.product.price, "product added");
        Ok(submission)
    }

    pub fn reset(&mut self) {
        self.disabled = false;
        self.submitted = false;
        self.form = ProductForm::default();
        self.focused = Some(AUTO_FOCUSED_FIELD);
        debug!("add-product form reset");
    }

    /// Releases the shop subscription.
    pub fn close(self) { self.shops.unsubscribe(); }

    fn ensure_enabled(&self) -> Result<()> {
        if self.disabled { Err(ShoppingError::FormDisabled) } else { Ok(()) }
    }
}
