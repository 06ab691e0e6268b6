//! 认知模型模块
//!
//! 认知模型是带权有向图：顶点是参数，边是参数之间的影响及其权重。
//! 稳定性由邻接矩阵的谱半径判断，所有特征值的模都小于1时模型稳定。

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 认知模型操作错误
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("顶点名称不能为空")]
    EmptyName,
    #[error("顶点已存在: {0}")]
    DuplicateVertex(String),
    #[error("顶点不存在: {0}")]
    UnknownVertex(String),
    #[error("一个或两个顶点不存在: {0}, {1}")]
    MissingEndpoints(String, String),
    #[error("连接不存在: {0} -> {1}")]
    UnknownConnection(String, String),
    #[error("请按格式输入: 顶点1, 顶点2, 权重")]
    InvalidConnectionFormat,
}

/// 带权连接
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from: String,
    pub to: String,
    pub weight: f64,
}

/// 稳定性结论
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stability {
    /// 没有顶点，无法判断
    Undefined,
    Stable,
    Unstable,
}

impl std::fmt::Display for Stability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stability::Undefined => write!(f, "模型稳定性: 无法判断（没有顶点）"),
            Stability::Stable => write!(f, "模型稳定性: 稳定"),
            Stability::Unstable => write!(f, "模型稳定性: 不稳定"),
        }
    }
}

/// 稳定性检查结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityReport {
    pub stability: Stability,
    /// 谱半径（最大特征值的模），没有顶点时为 None
    pub spectral_radius: Option<f64>,
    /// 各特征值的模
    pub magnitudes: Vec<f64>,
}

/// 认知模型
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CognitiveModel {
    /// 顶点（按加入顺序）
    #[serde(default)]
    vertices: Vec<String>,
    /// 连接（按加入顺序）
    #[serde(default)]
    connections: Vec<Connection>,
}

impl CognitiveModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[String] {
        &self.vertices
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.vertices.iter().position(|v| v == name)
    }

    /// 添加参数（顶点）
    pub fn add_parameter(&mut self, name: &str) -> Result<(), ModelError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ModelError::EmptyName);
        }
        if self.position(name).is_some() {
            return Err(ModelError::DuplicateVertex(name.to_string()));
        }
        self.vertices.push(name.to_string());
        Ok(())
    }

    /// 删除参数及其所有连接
    pub fn remove_parameter(&mut self, name: &str) -> Result<(), ModelError> {
        let name = name.trim();
        let pos = self
            .position(name)
            .ok_or_else(|| ModelError::UnknownVertex(name.to_string()))?;
        self.vertices.remove(pos);
        self.connections.retain(|c| c.from != name && c.to != name);
        Ok(())
    }

    /// 添加连接，连接已存在时更新权重
    pub fn add_connection(&mut self, from: &str, to: &str, weight: f64) -> Result<(), ModelError> {
        if self.position(from).is_none() || self.position(to).is_none() {
            return Err(ModelError::MissingEndpoints(from.to_string(), to.to_string()));
        }

        if let Some(existing) = self
            .connections
            .iter_mut()
            .find(|c| c.from == from && c.to == to)
        {
            existing.weight = weight;
        } else {
            self.connections.push(Connection {
                from: from.to_string(),
                to: to.to_string(),
                weight,
            });
        }
        Ok(())
    }

    /// 删除连接
    pub fn remove_connection(&mut self, from: &str, to: &str) -> Result<(), ModelError> {
        let pos = self
            .connections
            .iter()
            .position(|c| c.from == from && c.to == to)
            .ok_or_else(|| ModelError::UnknownConnection(from.to_string(), to.to_string()))?;
        self.connections.remove(pos);
        Ok(())
    }

    /// 解析 "顶点1, 顶点2, 权重" 格式的连接描述
    pub fn parse_connection(input: &str) -> Result<Connection, ModelError> {
        let parts: Vec<&str> = input.trim().split(',').map(str::trim).collect();
        let [from, to, weight] = parts.as_slice() else {
            return Err(ModelError::InvalidConnectionFormat);
        };
        let weight: f64 = weight
            .parse()
            .map_err(|_| ModelError::InvalidConnectionFormat)?;
        if !weight.is_finite() {
            return Err(ModelError::InvalidConnectionFormat);
        }

        Ok(Connection {
            from: from.to_string(),
            to: to.to_string(),
            weight,
        })
    }

    /// 邻接矩阵，行为起点，列为终点，顺序与顶点加入顺序一致
    pub fn adjacency_matrix(&self) -> DMatrix<f64> {
        let n = self.vertices.len();
        let mut matrix = DMatrix::zeros(n, n);
        for c in &self.connections {
            if let (Some(i), Some(j)) = (self.position(&c.from), self.position(&c.to)) {
                matrix[(i, j)] = c.weight;
            }
        }
        matrix
    }

    /// 检查模型稳定性
    pub fn check_stability(&self) -> StabilityReport {
        if self.vertices.is_empty() {
            return StabilityReport {
                stability: Stability::Undefined,
                spectral_radius: None,
                magnitudes: Vec::new(),
            };
        }

        let eigenvalues = self.adjacency_matrix().complex_eigenvalues();
        let magnitudes: Vec<f64> = eigenvalues.iter().map(|z| z.norm()).collect();
        // 求解溢出时特征值为 NaN 或无穷大，直接视为不稳定
        let radius = match magnitudes.iter().copied().find(|m| !m.is_finite()) {
            Some(non_finite) => non_finite,
            None => magnitudes.iter().copied().fold(0.0_f64, f64::max),
        };

        let stability = if radius.is_finite() && radius < 1.0 {
            Stability::Stable
        } else {
            Stability::Unstable
        };

        tracing::info!("稳定性检查: 谱半径 {:.4}, {}", radius, stability);

        StabilityReport {
            stability,
            spectral_radius: Some(radius),
            magnitudes,
        }
    }
}
