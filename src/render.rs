use std::fmt::Write as FmtWrite;

use crate::chord::frame_view;
use crate::cycles::compute_cycle_count;
use crate::error::InvalidParameter;
use crate::node::generate_nodes;

/// SVG 出力のオプション。配色は元のデモ（黒地・シアン節点・ピンク弦）。
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// 節点番号を表示するか
    pub show_numbers: bool,
    /// アクティブ弦を黄色で強調するか
    pub highlight_active: bool,
    /// 出力サイズ (px)
    pub size: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            show_numbers: true,
            highlight_active: true,
            size: 700,
        }
    }
}

const BG: &str = "#000000";
const NODE_COLOR: &str = "#00ffff";
const THREAD_COLOR: &str = "#e91e63";
const ACTIVE_COLOR: &str = "#ffff00";
const START_MARK: &str = "#00ff00";
const END_MARK: &str = "#ff0000";

/// フレーム m までの糸掛けアートを SVG 文書として生成する。
///
/// 座標系は [-1.4, 1.4]²、数学系の y 上向き（SVG 側では反転して出力）。
/// m = N で完成図。純粋関数でファイル I/O は行わない。
pub fn render_svg(
    n: u64,
    k: u64,
    m: u64,
    opts: &RenderOptions,
) -> Result<String, InvalidParameter> {
    let nodes = generate_nodes(n)?;
    let view = frame_view(n, k, m)?;
    let cycles = compute_cycle_count(n, k)?;

    let mut svg = String::with_capacity(4096 + nodes.len() * 160);
    let _ = writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{0}\" height=\"{0}\" viewBox=\"-1.4 -1.4 2.8 2.8\">",
        opts.size
    );
    let _ = writeln!(svg, "<rect x=\"-1.4\" y=\"-1.4\" width=\"2.8\" height=\"2.8\" fill=\"{}\"/>", BG);

    // 描画済みの弦
    for c in &view.completed {
        let a = &nodes[c.start as usize];
        let b = &nodes[c.end as usize];
        let _ = writeln!(
            svg,
            "<line x1=\"{:.4}\" y1=\"{:.4}\" x2=\"{:.4}\" y2=\"{:.4}\" stroke=\"{}\" stroke-width=\"0.008\" opacity=\"0.9\"/>",
            a.x, -a.y, b.x, -b.y, THREAD_COLOR
        );
    }

    // 節点
    for nd in &nodes {
        let _ = writeln!(
            svg,
            "<circle cx=\"{:.4}\" cy=\"{:.4}\" r=\"0.02\" fill=\"{}\"/>",
            nd.x, -nd.y, NODE_COLOR
        );
    }

    if opts.show_numbers {
        for nd in &nodes {
            let _ = writeln!(
                svg,
                "<text x=\"{:.4}\" y=\"{:.4}\" fill=\"#ffffff\" font-size=\"0.05\" text-anchor=\"middle\" dominant-baseline=\"middle\">{}</text>",
                nd.x * 1.1, -nd.y * 1.1, nd.index
            );
        }
    }

    // アクティブ弦の強調（始点=緑、終点=赤）
    if opts.highlight_active {
        if let Some(c) = view.active {
            let a = &nodes[c.start as usize];
            let b = &nodes[c.end as usize];
            let _ = writeln!(
                svg,
                "<line x1=\"{:.4}\" y1=\"{:.4}\" x2=\"{:.4}\" y2=\"{:.4}\" stroke=\"{}\" stroke-width=\"0.025\"/>",
                a.x, -a.y, b.x, -b.y, ACTIVE_COLOR
            );
            let _ = writeln!(
                svg,
                "<circle cx=\"{:.4}\" cy=\"{:.4}\" r=\"0.04\" fill=\"{}\"/>",
                a.x, -a.y, START_MARK
            );
            let _ = writeln!(
                svg,
                "<circle cx=\"{:.4}\" cy=\"{:.4}\" r=\"0.04\" fill=\"{}\"/>",
                b.x, -b.y, END_MARK
            );
        }
    }

    // 数式サマリー（左上、等幅）
    let summary = [
        "Rule:".to_string(),
        "  end = (i \u{00d7} k) mod N".to_string(),
        String::new(),
        "Parameters:".to_string(),
        format!("  N = {},  k = {}", n, k),
        String::new(),
        "Final Structure:".to_string(),
        "  focal loops = gcd(N, k \u{2212} 1)".to_string(),
        format!("  gcd({}, {}) = {}", n, k - 1, cycles),
    ];
    let _ = writeln!(
        svg,
        "<text x=\"-1.35\" y=\"-1.25\" fill=\"#ffffff\" font-family=\"monospace\" font-size=\"0.07\" xml:space=\"preserve\">"
    );
    for (row, line) in summary.iter().enumerate() {
        let _ = writeln!(
            svg,
            "<tspan x=\"-1.35\" y=\"{:.3}\">{}</tspan>",
            -1.25 + row as f64 * 0.09,
            line
        );
    }
    let _ = writeln!(svg, "</text>");

    svg.push_str("</svg>\n");
    Ok(svg)
}
