//! Store actor: the single owner of shopping state

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info};

use crate::domain::{Product, ProductId, Shop, ShoppingEvent};
use crate::store::ShoppingState;
use crate::workflow::{Submission, ValidProductForm};
use crate::{Result, ShoppingError};

pub type Response<T> = oneshot::Sender<Result<T>>;

#[derive(Debug)]
pub enum StoreCommand {
    Dispatch {
        event: ShoppingEvent,
    },
    Snapshot {
        respond_to: oneshot::Sender<ShoppingState>,
    },
    AddProduct {
        input: ValidProductForm,
        respond_to: Response<Submission>,
    },
    RemoveProduct {
        id: ProductId,
        respond_to: Response<Product>,
    },
    ToggleReceived {
        id: ProductId,
        respond_to: Response<Product>,
    },
}

/// Drains commands one at a time, so every read-modify-write on the state
/// is serialized. The shop list is republished after each mutation.
pub struct ShoppingStore {
    receiver: mpsc::Receiver<StoreCommand>,
    state: ShoppingState,
    shops: watch::Sender<Vec<Shop>>,
}

impl ShoppingStore {
    pub fn new(state: ShoppingState, buffer_size: usize) -> (Self, StoreHandle) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (shops, shops_rx) = watch::channel(state.shops().to_vec());
        let store = Self { receiver, state, shops };
        (store, StoreHandle { sender, shops: shops_rx })
    }

    /// Starts the actor on the current runtime.
    pub fn spawn(state: ShoppingState, buffer_size: usize) -> StoreHandle {
        let (store, handle) = Self::new(state, buffer_size);
        tokio::spawn(store.run());
        handle
    }

    pub async fn run(mut self) {
        info!(shops = self.state.shops().len(), products = self.state.products().len(), "shopping store started");
        while let Some(command) = self.receiver.recv().await {
            match command {
                StoreCommand::Dispatch { event } => {
                    debug!(event = event.name(), "applying event");
                    self.state.apply(event);
                    self.publish_shops();
                }
                StoreCommand::Snapshot { respond_to } => {
                    let _ = respond_to.send(self.state.clone());
                }
                StoreCommand::AddProduct { input, respond_to } => {
                    let result = self.state.plan_add(input).map(|(submission, events)| {
                        self.apply_all(events);
                        submission
                    });
                    let _ = respond_to.send(result);
                }
                StoreCommand::RemoveProduct { id, respond_to } => {
                    let result = self.state.plan_remove(&id).and_then(|events| {
                        let removed = self.state.product(&id).cloned().ok_or_else(|| ShoppingError::ProductNotFound(id.to_string()))?;
                        self.apply_all(events);
                        Ok(removed)
                    });
                    let _ = respond_to.send(result);
                }
                StoreCommand::ToggleReceived { id, respond_to } => {
                    let result = self.state.plan_toggle_received(&id).and_then(|events| {
                        self.apply_all(events);
                        self.state.product(&id).cloned().ok_or_else(|| ShoppingError::ProductNotFound(id.to_string()))
                    });
                    let _ = respond_to.send(result);
                }
            }
        }
        info!("shopping store stopped");
    }

    fn apply_all(&mut self, events: Vec<ShoppingEvent>) {
        for event in events {
            debug!(event = event.name(), "applying event");
            self.state.apply(event);
        }
        self.publish_shops();
    }

    fn publish_shops(&self) {
        self.shops.send_replace(self.state.shops().to_vec());
    }
}

/// Cloneable handle for talking to a running [`ShoppingStore`].
#[derive(Clone, Debug)]
pub struct StoreHandle {
    sender: mpsc::Sender<StoreCommand>,
    shops: watch::Receiver<Vec<Shop>>,
}

impl StoreHandle {
    pub async fn dispatch(&self, event: ShoppingEvent) -> Result<()> {
        self.sender.send(StoreCommand::Dispatch { event }).await.map_err(|_| ShoppingError::StoreClosed)
    }

    pub async fn snapshot(&self) -> Result<ShoppingState> {
        let (respond_to, response) = oneshot::channel();
        self.sender.send(StoreCommand::Snapshot { respond_to }).await.map_err(|_| ShoppingError::StoreClosed)?;
        response.await.map_err(|_| ShoppingError::StoreClosed)
    }

    pub async fn shops(&self) -> Result<Vec<Shop>> { Ok(self.snapshot().await?.shops().to_vec()) }

    pub async fn products(&self) -> Result<Vec<Product>> { Ok(self.snapshot().await?.products().to_vec()) }

    pub async fn shop(&self, id: &str) -> Result<Shop> {
        self.snapshot().await?.shop(id).cloned().ok_or_else(|| ShoppingError::ShopNotFound(id.to_string()))
    }

    /// Looks up the shop, creates the product and applies the new totals as
    /// one step, so concurrent adds to a shop never overwrite each other.
    pub async fn add_product(&self, input: ValidProductForm) -> Result<Submission> {
        let (respond_to, response) = oneshot::channel();
        self.sender.send(StoreCommand::AddProduct { input, respond_to }).await.map_err(|_| ShoppingError::StoreClosed)?;
        response.await.map_err(|_| ShoppingError::StoreClosed)?
    }

    pub async fn remove_product(&self, id: ProductId) -> Result<Product> {
        let (respond_to, response) = oneshot::channel();
        self.sender.send(StoreCommand::RemoveProduct { id, respond_to }).await.map_err(|_| ShoppingError::StoreClosed)?;
        response.await.map_err(|_| ShoppingError::StoreClosed)?
    }

    pub async fn toggle_received(&self, id: ProductId) -> Result<Product> {
        let (respond_to, response) = oneshot::channel();
        self.sender.send(StoreCommand::ToggleReceived { id, respond_to }).await.map_err(|_| ShoppingError::StoreClosed)?;
        response.await.map_err(|_| ShoppingError::StoreClosed)?
    }

    pub fn subscribe_shops(&self) -> ShopsSubscription {
        ShopsSubscription { receiver: self.shops.clone() }
    }
}

/// Live view of the shop list. Dropping it (or calling
/// [`ShopsSubscription::unsubscribe`]) releases the subscription.
#[derive(Debug)]
pub struct ShopsSubscription {
    receiver: watch::Receiver<Vec<Shop>>,
}

impl ShopsSubscription {
    pub fn current(&self) -> Vec<Shop> { self.receiver.borrow().clone() }

    /// Waits for the next published shop list.
    pub async fn changed(&mut self) -> Result<Vec<Shop>> {
        self.receiver.changed().await.map_err(|_| ShoppingError::StoreClosed)?;
        Ok(self.receiver.borrow_and_update().clone())
    }

    pub fn unsubscribe(self) {
        debug!("shop subscription released");
    }
}
