//! 剰余乗算による糸掛けアート（thread art）生成エンジン
//!
//! 円周上の N 個の節点に対し、規則 end = (i × k) mod N で弦を張る。
//! 完成図が分解する焦点ループの個数は描画前から gcd(N, k−1) で確定する。
//!
//! 計算核（節点座標・弦列・ループ数）はすべて純粋関数で、状態も時間も
//! 持たない。フレーム送り・自動再生などの提示層の制御は CLI / GUI 側が
//! `FrameState` を所有して行う。

pub mod chord;
pub mod cycles;
pub mod error;
pub mod frame;
pub mod node;
pub mod render;
pub mod sweep;

pub use chord::{compute_chord, frame_view, generate_all_chords, Chord, ChordIter, FrameView};
pub use cycles::{compute_cycle_count, fixed_points};
pub use error::InvalidParameter;
pub use frame::FrameState;
pub use node::{generate_nodes, Node};
pub use render::{render_svg, RenderOptions};
pub use sweep::{sweep_grid, sweep_grid_parallel, sweep_grid_parallel_cancellable, SweepStats};
