//! Core模块 - 规则检查与认知模型的全部逻辑

pub mod models;
pub mod parser;
pub mod consistency;
pub mod redundancy;
pub mod cycles;
pub mod checker;
pub mod cognitive;

#[cfg(test)]
mod sim_integration_tests;
