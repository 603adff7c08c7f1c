// Domain layer: 財政年度規則、資料模型與介面 (ports)

pub mod fiscal;
pub mod model;
pub mod ports;
