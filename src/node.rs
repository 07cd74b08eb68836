use crate::error::{check_n, InvalidParameter};

/// 単位円周上の節点。
///
/// 節点 i は角度 2π·i/N（角度0起点、反時計回り）に置かれる。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub index: u64,
    pub x: f64,
    pub y: f64,
}

/// 単位円周上に N 個の節点を等間隔に生成する。
///
/// 決定的な純粋関数。N < 2 なら `InvalidParameter`。
pub fn generate_nodes(n: u64) -> Result<Vec<Node>, InvalidParameter> {
    check_n(n)?;
    let mut nodes = Vec::with_capacity(n as usize);
    for i in 0..n {
        let theta = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
        nodes.push(Node {
            index: i,
            x: theta.cos(),
            y: theta.sin(),
        });
    }
    Ok(nodes)
}
