//! Dishes service.

use async_trait::async_trait;
use mockall::automock;
use pedido_listo::menu::{ItemStatus, MenuItem, MenuItemId, NewMenuItem};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::backend::{BackendError, GraphqlClient, Operation};

const LIST_DISHES: Operation = Operation {
    field: "platillos",
    document: r"
        query GetPlatillos {
            platillos {
                id
                categoriaNombre
                nombreItem
                descripcion
                precio
                disponible
                estado
            }
        }
    ",
};

const CREATE_DISH: Operation = Operation {
    field: "createPlatillo",
    document: r"
        mutation CreatePlatillo($createPlatilloInput: CreatePlatilloInput!) {
            createPlatillo(createPlatilloInput: $createPlatilloInput) {
                id
                nombreItem
            }
        }
    ",
};

const UPDATE_DISH: Operation = Operation {
    field: "updatePlatillo",
    document: r"
        mutation UpdatePlatillo($updatePlatilloInput: UpdatePlatilloInput!) {
            updatePlatillo(updatePlatilloInput: $updatePlatilloInput) {
                id
                estado
            }
        }
    ",
};

#[derive(Debug, Deserialize)]
struct DishRef {
    id: MenuItemId,
}

#[derive(Debug, Clone)]
pub struct GraphqlMenuService {
    client: GraphqlClient,
}

impl GraphqlMenuService {
    #[must_use]
    pub fn new(client: GraphqlClient) -> Self {
        Self { client }
    }
}

#[async_trait(?Send)]
impl MenuService for GraphqlMenuService {
    async fn list_dishes(&self) -> Result<Vec<MenuItem>, BackendError> {
        self.client.execute(LIST_DISHES, Value::Null).await
    }

    async fn create_dish(&self, dish: &NewMenuItem) -> Result<MenuItem, BackendError> {
        let created: DishRef = self
            .client
            .execute(CREATE_DISH, json!({ "createPlatilloInput": dish }))
            .await?;

        Ok(created_item(created.id, dish))
    }

    async fn update_dish(&self, id: MenuItemId, dish: &NewMenuItem) -> Result<MenuItem, BackendError> {
        let updated: DishRef = self
            .client
            .execute(UPDATE_DISH, update_variables(id, dish)?)
            .await?;

        Ok(created_item(updated.id, dish))
    }

    async fn set_dish_status(&self, id: MenuItemId, status: ItemStatus) -> Result<(), BackendError> {
        let variables = json!({
            "updatePlatilloInput": { "id": id, "estado": status }
        });

        let _: DishRef = self.client.execute(UPDATE_DISH, variables).await?;

        Ok(())
    }
}

/// The backend only echoes the id; the rest comes from what was sent.
fn created_item(id: MenuItemId, dish: &NewMenuItem) -> MenuItem {
    MenuItem {
        id,
        category: dish.category.clone(),
        name: dish.name.clone(),
        description: dish.description.clone(),
        price: dish.price,
        available: dish.status == ItemStatus::Active,
        status: dish.status,
    }
}

fn update_variables(id: MenuItemId, dish: &NewMenuItem) -> Result<Value, BackendError> {
    let mut input = serde_json::to_value(dish)?;

    if let Some(fields) = input.as_object_mut() {
        fields.insert("id".to_string(), json!(id));
    }

    Ok(json!({ "updatePlatilloInput": input }))
}

#[automock]
#[async_trait(?Send)]
pub trait MenuService: Send + Sync {
    /// Every dish, orderable or not.
    async fn list_dishes(&self) -> Result<Vec<MenuItem>, BackendError>;

    /// Creates a dish and returns it with its assigned id.
    async fn create_dish(&self, dish: &NewMenuItem) -> Result<MenuItem, BackendError>;

    /// Replaces the editable fields of dish `id`.
    async fn update_dish(&self, id: MenuItemId, dish: &NewMenuItem) -> Result<MenuItem, BackendError>;

    /// Moves dish `id` to `status`.
    async fn set_dish_status(&self, id: MenuItemId, status: ItemStatus) -> Result<(), BackendError>;
}
