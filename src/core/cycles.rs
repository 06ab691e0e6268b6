//! 循环依赖检查模块
//!
//! 每条规则在依赖图中产生一条 条件 -> 结果 的有向边，重复边只保留一条。
//! 在强连通分量内使用 Johnson 算法枚举所有简单环。

use crate::core::parser::RuleParser;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Serialize, Serializer};
use std::collections::{HashMap, HashSet};

/// 规则依赖图
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraph<String, ()>,
    /// 节点名 -> 节点索引
    index: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取或创建节点
    fn node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }

    /// 添加依赖边，边已存在时返回 false
    pub fn add_dependency(&mut self, from: &str, to: &str) -> bool {
        let a = self.node(from);
        let b = self.node(to);
        if self.graph.find_edge(a, b).is_some() {
            return false;
        }
        self.graph.add_edge(a, b, ());
        true
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// 节点名（按加入顺序）
    pub fn nodes(&self) -> Vec<&str> {
        self.graph
            .node_indices()
            .map(|idx| self.graph[idx].as_str())
            .collect()
    }

    /// 边（按加入顺序）
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(a, b)| (self.graph[a].as_str(), self.graph[b].as_str()))
            .collect()
    }

    pub fn contains_edge(&self, from: &str, to: &str) -> bool {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&a), Some(&b)) => self.graph.contains_edge(a, b),
            _ => false,
        }
    }

    /// 枚举所有简单环
    ///
    /// 每个环从其中最早加入的节点开始，环之间按节点加入顺序排序，
    /// 因此相同输入总是得到相同输出。
    pub fn simple_cycles(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<NodeIndex>> = Vec::new();

        for mut component in tarjan_scc(&self.graph) {
            if component.len() == 1 {
                let node = component[0];
                if self.graph.contains_edge(node, node) {
                    cycles.push(vec![node]);
                }
                continue;
            }

            component.sort();
            for (pos, &start) in component.iter().enumerate() {
                let allowed: HashSet<NodeIndex> = component[pos..].iter().copied().collect();
                let mut search = CircuitSearch::new(&self.graph, start, allowed);
                search.circuit(start);
                cycles.append(&mut search.found);
            }
        }

        cycles.sort();
        cycles
            .into_iter()
            .map(|cycle| cycle.into_iter().map(|idx| self.graph[idx].clone()).collect())
            .collect()
    }
}

impl Serialize for DependencyGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct GraphView<'a> {
            nodes: Vec<&'a str>,
            edges: Vec<(&'a str, &'a str)>,
        }

        GraphView {
            nodes: self.nodes(),
            edges: self.edges(),
        }
        .serialize(serializer)
    }
}

/// Johnson 算法中以 start 为起点的回路搜索
struct CircuitSearch<'g> {
    graph: &'g DiGraph<String, ()>,
    start: NodeIndex,
    /// 可访问的节点（索引不小于 start 的分量成员）
    allowed: HashSet<NodeIndex>,
    blocked: HashSet<NodeIndex>,
    blocked_by: HashMap<NodeIndex, HashSet<NodeIndex>>,
    stack: Vec<NodeIndex>,
    found: Vec<Vec<NodeIndex>>,
}

impl<'g> CircuitSearch<'g> {
    fn new(graph: &'g DiGraph<String, ()>, start: NodeIndex, allowed: HashSet<NodeIndex>) -> Self {
        Self {
            graph,
            start,
            allowed,
            blocked: HashSet::new(),
            blocked_by: HashMap::new(),
            stack: Vec::new(),
            found: Vec::new(),
        }
    }

    fn successors(&self, v: NodeIndex) -> Vec<NodeIndex> {
        let mut next: Vec<NodeIndex> = self
            .graph
            .neighbors(v)
            .filter(|w| self.allowed.contains(w))
            .collect();
        next.sort();
        next.dedup();
        next
    }

    fn circuit(&mut self, v: NodeIndex) -> bool {
        let mut closed = false;
        self.stack.push(v);
        self.blocked.insert(v);

        let next = self.successors(v);
        for &w in &next {
            if w == self.start {
                self.found.push(self.stack.clone());
                closed = true;
            } else if !self.blocked.contains(&w) && self.circuit(w) {
                closed = true;
            }
        }

        if closed {
            self.unblock(v);
        } else {
            for w in next {
                self.blocked_by.entry(w).or_default().insert(v);
            }
        }

        self.stack.pop();
        closed
    }

    fn unblock(&mut self, v: NodeIndex) {
        self.blocked.remove(&v);
        if let Some(waiting) = self.blocked_by.remove(&v) {
            for w in waiting {
                if self.blocked.contains(&w) {
                    self.unblock(w);
                }
            }
        }
    }
}

/// 循环检查结果
#[derive(Debug, Clone, Default, Serialize)]
pub struct CycleReport {
    /// 依赖图
    pub graph: DependencyGraph,
    /// 简单环（节点名序列）
    pub cycles: Vec<Vec<String>>,
}

/// 循环依赖检查器
#[derive(Debug, Clone, Default)]
pub struct CycleDetector {
    parser: RuleParser,
}

impl CycleDetector {
    pub fn new(parser: RuleParser) -> Self {
        Self { parser }
    }

    /// 执行检查
    pub fn check<S: AsRef<str>>(&self, rules: &[S]) -> CycleReport {
        let mut graph = DependencyGraph::new();
        for (_, parsed) in self.parser.parse_all(rules) {
            graph.add_dependency(&parsed.condition, &parsed.result);
        }

        let cycles = graph.simple_cycles();
        tracing::debug!(
            "循环检查完成: {} 个节点, {} 条边, {} 个环",
            graph.node_count(),
            graph.edge_count(),
            cycles.len()
        );

        CycleReport { graph, cycles }
    }
}
