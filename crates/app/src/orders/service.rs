//! Orders service.

use async_trait::async_trait;
use mockall::automock;
use pedido_listo::orders::{
    NewOrder, NewOrderLine, Order, OrderHeader, OrderId, OrderLineInput, OrderStatus,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::backend::{BackendError, GraphqlClient, Operation};

const LIST_ORDERS: Operation = Operation {
    field: "pedidos",
    document: r"
        query GetPedidos {
            pedidos {
                id
                usuarioCedula
                tipoEntrega
                direccionEntrega
                montoTotal
                estadoPedido
                fechaPedido
                usuario { cedula nombre email }
                detalles {
                    id
                    cantidad
                    precioUnitario
                    subtotal
                    notasAdicionales
                    platillo { id nombreItem }
                }
            }
        }
    ",
};

const CREATE_ORDER: Operation = Operation {
    field: "createPedido",
    document: r"
        mutation CreatePedido($createPedidoInput: CreatePedidoInput!) {
            createPedido(createPedidoInput: $createPedidoInput) {
                id
                usuarioCedula
                montoTotal
            }
        }
    ",
};

const CREATE_ORDER_LINE: Operation = Operation {
    field: "createDetallePedido",
    document: r"
        mutation CreateDetallePedido($createDetallePedidoInput: CreateDetallePedidoInput!) {
            createDetallePedido(createDetallePedidoInput: $createDetallePedidoInput) {
                id
            }
        }
    ",
};

const UPDATE_ORDER: Operation = Operation {
    field: "updatePedido",
    document: r"
        mutation UpdatePedidoEstado($updatePedidoInput: UpdatePedidoInput!) {
            updatePedido(updatePedidoInput: $updatePedidoInput) {
                id
                estadoPedido
            }
        }
    ",
};

#[derive(Debug, Deserialize)]
struct Created {
    id: OrderId,
}

#[derive(Debug, Clone)]
pub struct GraphqlOrdersService {
    client: GraphqlClient,
}

impl GraphqlOrdersService {
    #[must_use]
    pub fn new(client: GraphqlClient) -> Self {
        Self { client }
    }
}

#[async_trait(?Send)]
impl OrdersService for GraphqlOrdersService {
    async fn list_orders(&self) -> Result<Vec<Order>, BackendError> {
        self.client.execute(LIST_ORDERS, Value::Null).await
    }

    async fn create_order(&self, order: &NewOrder) -> Result<OrderId, BackendError> {
        let created: Created = self
            .client
            .execute(CREATE_ORDER, json!({ "createPedidoInput": order }))
            .await?;

        Ok(created.id)
    }

    async fn create_order_header(&self, header: &OrderHeader) -> Result<OrderId, BackendError> {
        let created: Created = self
            .client
            .execute(CREATE_ORDER, json!({ "createPedidoInput": header }))
            .await?;

        Ok(created.id)
    }

    async fn create_order_line(
        &self,
        order_id: OrderId,
        line: &NewOrderLine,
    ) -> Result<(), BackendError> {
        let line = OrderLineInput { order_id, line };

        let _: Value = self
            .client
            .execute(
                CREATE_ORDER_LINE,
                json!({ "createDetallePedidoInput": line }),
            )
            .await?;

        Ok(())
    }

    async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<(), BackendError> {
        let variables = json!({
            "updatePedidoInput": { "id": id, "estadoPedido": status }
        });

        let _: Value = self.client.execute(UPDATE_ORDER, variables).await?;

        Ok(())
    }
}

#[automock]
#[async_trait(?Send)]
pub trait OrdersService: Send + Sync {
    /// Every order visible to the signed-in user.
    async fn list_orders(&self) -> Result<Vec<Order>, BackendError>;

    /// Creates an order and its lines in one request.
    async fn create_order(&self, order: &NewOrder) -> Result<OrderId, BackendError>;

    /// Creates an order header without lines.
    async fn create_order_header(&self, header: &OrderHeader) -> Result<OrderId, BackendError>;

    /// Attaches one line to an existing order header.
    async fn create_order_line(
        &self,
        order_id: OrderId,
        line: &NewOrderLine,
    ) -> Result<(), BackendError>;

    /// Moves order `id` to `status`.
    async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<(), BackendError>;
}
