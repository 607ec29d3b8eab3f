use ethers::prelude::abigen;

use crate::domain::OrderStatus;

// ==================================================
// ABI GENERATION
// ==================================================

abigen!(
    Erc20,
    r#"[
        function balanceOf(address owner) view returns (uint256)
        function allowance(address owner, address spender) view returns (uint256)
        function approve(address spender, uint256 amount) returns (bool)
    ]"#
);

abigen!(
    AccountManager,
    r#"[
        function getAccountBalance(address account, address token) view returns (uint256)
        function deposit(address account, address token, uint256 amount)
    ]"#
);

abigen!(
    Clob,
    r#"[
        function postLimitOrder(address account, uint8 side, uint256 amountInBase, uint256 price, uint8 timeInForce) returns (uint256)
        function getOrder(uint256 orderId) view returns (address owner, uint8 side, uint256 price, uint256 amount, uint8 status)
        event LimitOrderSubmitted(address indexed owner, uint256 indexed orderId, uint8 side, uint256 price, uint256 amount)
    ]"#
);

/// Order status discriminant as stored by the CLOB.
pub fn order_status_from_u8(raw: u8) -> Option<OrderStatus> {
    match raw {
        0 => Some(OrderStatus::Pending),
        1 => Some(OrderStatus::Open),
        2 => Some(OrderStatus::Filled),
        3 => Some(OrderStatus::Cancelled),
        4 => Some(OrderStatus::Rejected),
        _ => None,
    }
}
