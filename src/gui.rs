#![windows_subsystem = "windows"]

use modmul_threadart::*;
use eframe::egui;
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoint, PlotPoints, Points, Text};
use std::fs::File;
use std::io::Write as IoWrite;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_title("Thread Art - Modular Multiplication"),
        ..Default::default()
    };
    eframe::run_native(
        "modmul-threadart",
        options,
        Box::new(|cc| {
            setup_japanese_font(&cc.egui_ctx);
            Ok(Box::new(ThreadArtApp::default()))
        }),
    )
}

fn setup_japanese_font(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();
    let font_paths = [
        "C:\\Windows\\Fonts\\YuGothR.ttc",
        "C:\\Windows\\Fonts\\YuGothM.ttc",
        "C:\\Windows\\Fonts\\msgothic.ttc",
        "C:\\Windows\\Fonts\\meiryo.ttc",
    ];
    for path in &font_paths {
        if let Ok(data) = std::fs::read(path) {
            fonts.font_data.insert(
                "japanese".to_owned(),
                egui::FontData::from_owned(data),
            );
            fonts.families
                .entry(egui::FontFamily::Proportional)
                .or_default()
                .insert(0, "japanese".to_owned());
            fonts.families
                .entry(egui::FontFamily::Monospace)
                .or_default()
                .push("japanese".to_owned());
            break;
        }
    }
    ctx.set_fonts(fonts);
}

fn output_dir() -> PathBuf {
    let dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.join("output")))
        .unwrap_or_else(|| PathBuf::from("output"));
    std::fs::create_dir_all(&dir).ok();
    dir
}

fn timestamp() -> String {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs();
    let s = now % 60;
    let m = (now / 60) % 60;
    let h = (now / 3600) % 24;
    let days = now / 86400;
    let y = 1970 + days / 365;
    let d = days % 365;
    format!("{:04}{:03}_{:02}{:02}{:02}", y, d, h, m, s)
}

// ─── データ構造 ─────────────────────────────────────

#[derive(PartialEq)]
enum Tab { Draw, Sweep }

struct SweepResultDisplay {
    cells: u64,
    single_loop_cells: u64,
    max_cycles: u64,
    max_cycles_cell: (u64, u64),
    cancelled: bool,
    cycle_hist: Vec<u64>,
    elapsed_s: f64,
    save_path: Option<String>,
}

struct SweepState {
    running: bool,
    done: u64,
    total: u64,
    cps: f64,
    elapsed_s: f64,
    result: Option<SweepResultDisplay>,
}

struct ThreadArtApp {
    tab: Tab,
    // 描画タブ
    n: u64,
    k: u64,
    show_numbers: bool,
    highlight_active: bool,
    interval_ms: u64,
    frame: FrameState,
    last_tick: Instant,
    // 掃引タブ
    sweep_n_lo_input: String,
    sweep_n_hi_input: String,
    sweep_k_lo_input: String,
    sweep_k_hi_input: String,
    sweep_state: Arc<Mutex<SweepState>>,
    sweep_cancel: Arc<AtomicBool>,
}

impl Default for ThreadArtApp {
    fn default() -> Self {
        Self {
            tab: Tab::Draw,
            n: 60,
            k: 7,
            show_numbers: true,
            highlight_active: true,
            interval_ms: 100,
            frame: FrameState::new(),
            last_tick: Instant::now(),
            sweep_n_lo_input: "2".to_string(),
            sweep_n_hi_input: "200".to_string(),
            sweep_k_lo_input: "1".to_string(),
            sweep_k_hi_input: "50".to_string(),
            sweep_state: Arc::new(Mutex::new(SweepState {
                running: false, done: 0, total: 0, cps: 0.0, elapsed_s: 0.0, result: None,
            })),
            sweep_cancel: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl eframe::App for ThreadArtApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        {
            let sweep_running = self.sweep_state.lock().unwrap().running;
            if sweep_running {
                ctx.request_repaint();
            }
        }

        // 自動再生: 経過時間でフレームを進める（エンジンは時間を持たない）
        if self.frame.auto_play {
            if self.last_tick.elapsed().as_millis() as u64 >= self.interval_ms {
                self.frame.next(self.n);
                self.last_tick = Instant::now();
            }
            ctx.request_repaint_after(Duration::from_millis(self.interval_ms.min(50)));
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Thread Art");
                ui.separator();
                ui.label("N:");
                let n_resp = ui.add(egui::Slider::new(&mut self.n, 2..=200));
                ui.label("k:");
                ui.add(egui::Slider::new(&mut self.k, 1..=50));
                if n_resp.changed() {
                    // N 変更時はフレームを再クランプ
                    self.frame.clamp(self.n);
                }
                ui.separator();
                ui.checkbox(&mut self.show_numbers, "節点番号");
                ui.checkbox(&mut self.highlight_active, "アクティブ弦強調");
                ui.separator();
                if ui.selectable_label(self.tab == Tab::Draw, "描画").clicked() {
                    self.tab = Tab::Draw;
                }
                if ui.selectable_label(self.tab == Tab::Sweep, "掃引").clicked() {
                    self.tab = Tab::Sweep;
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            match self.tab {
                Tab::Draw => self.ui_draw(ui),
                Tab::Sweep => self.ui_sweep(ui),
            }
        });
    }
}

impl ThreadArtApp {
    // ─── 描画タブ ──────────────────────────────
    fn ui_draw(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("前へ").clicked() {
                self.frame.previous();
            }
            if ui.button("次へ").clicked() {
                self.frame.next(self.n);
            }
            if !self.frame.auto_play {
                if ui.button("自動再生").clicked() {
                    self.frame.play();
                    self.last_tick = Instant::now();
                }
            } else {
                if ui.button("停止").clicked() {
                    self.frame.stop();
                }
            }
            if ui.button("最初へ").clicked() {
                self.frame.stop();
                self.frame.frame = 0;
            }
            if ui.button("完成図").clicked() {
                self.frame.stop();
                self.frame.frame = self.n.saturating_sub(1);
            }
            ui.separator();
            ui.label("間隔(ms):");
            ui.add(egui::Slider::new(&mut self.interval_ms, 10..=1000));
            ui.separator();
            ui.label(format!("frame {}/{}", self.frame.frame, self.n.saturating_sub(1)));
        });

        ui.separator();

        let nodes = match generate_nodes(self.n) {
            Ok(v) => v,
            Err(_) => return,
        };
        let view = match frame_view(self.n, self.k, self.frame.frame) {
            Ok(v) => v,
            Err(_) => return,
        };
        let cycles = match compute_cycle_count(self.n, self.k) {
            Ok(c) => c,
            Err(_) => return,
        };

        ui.horizontal(|ui| {
            ui.monospace(format!(
                "end = (i × k) mod N | N = {}, k = {} | focal loops = gcd({}, {}) = {}",
                self.n, self.k, self.n, self.k - 1, cycles
            ));
        });

        Plot::new("threadart_plot")
            .data_aspect(1.0)
            .show_axes([false, false])
            .show_grid(false)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .include_x(-1.4)
            .include_x(1.4)
            .include_y(-1.4)
            .include_y(1.4)
            .show(ui, |plot_ui| {
                // 描画済みの弦
                for c in &view.completed {
                    let a = &nodes[c.start as usize];
                    let b = &nodes[c.end as usize];
                    plot_ui.line(
                        Line::new(PlotPoints::from(vec![[a.x, a.y], [b.x, b.y]]))
                            .color(egui::Color32::from_rgb(233, 30, 99))
                            .width(0.8),
                    );
                }

                // アクティブ弦（始点=緑、終点=赤）
                if self.highlight_active {
                    if let Some(c) = view.active {
                        let a = &nodes[c.start as usize];
                        let b = &nodes[c.end as usize];
                        plot_ui.line(
                            Line::new(PlotPoints::from(vec![[a.x, a.y], [b.x, b.y]]))
                                .color(egui::Color32::YELLOW)
                                .width(2.5),
                        );
                        plot_ui.points(
                            Points::new(PlotPoints::from(vec![[a.x, a.y]]))
                                .color(egui::Color32::from_rgb(0, 255, 0))
                                .radius(6.0),
                        );
                        plot_ui.points(
                            Points::new(PlotPoints::from(vec![[b.x, b.y]]))
                                .color(egui::Color32::RED)
                                .radius(6.0),
                        );
                    }
                }

                // 節点
                let node_pts: Vec<[f64; 2]> = nodes.iter().map(|nd| [nd.x, nd.y]).collect();
                plot_ui.points(
                    Points::new(PlotPoints::from(node_pts))
                        .color(egui::Color32::from_rgb(0, 255, 255))
                        .radius(2.5),
                );

                if self.show_numbers {
                    for nd in &nodes {
                        plot_ui.text(Text::new(
                            PlotPoint::new(nd.x * 1.1, nd.y * 1.1),
                            egui::RichText::new(format!("{}", nd.index)).size(9.0),
                        ));
                    }
                }
            });
    }

    // ─── 掃引タブ ──────────────────────────────
    fn ui_sweep(&mut self, ui: &mut egui::Ui) {
        let running = self.sweep_state.lock().unwrap().running;

        ui.horizontal(|ui| {
            ui.label("N:");
            ui.add(egui::TextEdit::singleline(&mut self.sweep_n_lo_input).desired_width(60.0));
            ui.label("〜");
            ui.add(egui::TextEdit::singleline(&mut self.sweep_n_hi_input).desired_width(60.0));
            ui.label("k:");
            ui.add(egui::TextEdit::singleline(&mut self.sweep_k_lo_input).desired_width(60.0));
            ui.label("〜");
            ui.add(egui::TextEdit::singleline(&mut self.sweep_k_hi_input).desired_width(60.0));
            if !running {
                if ui.button("掃引開始").clicked() {
                    self.start_sweep();
                }
            } else {
                if ui.button("停止").clicked() {
                    self.sweep_cancel.store(true, Ordering::Relaxed);
                }
            }
        });

        ui.separator();

        let state = self.sweep_state.lock().unwrap();

        if state.running && state.total > 0 {
            let pct = state.done as f32 / state.total as f32;
            ui.add(egui::ProgressBar::new(pct).text(format!(
                "{}/{} ({:.1}%) | {:.0} cells/s | {:.1}s",
                state.done, state.total, pct * 100.0, state.cps, state.elapsed_s
            )));
        }

        if let Some(ref result) = state.result {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading(if result.cancelled { "掃引結果 (中断)" } else { "掃引結果" });

                egui::Grid::new("sweep_grid").striped(true).show(ui, |ui| {
                    ui.label("走査セル数"); ui.label(format!("{}", result.cells)); ui.end_row();
                    ui.label("単一ループのセル");
                    ui.label(if result.cells > 0 {
                        format!("{} ({:.1}%)", result.single_loop_cells,
                            result.single_loop_cells as f64 / result.cells as f64 * 100.0)
                    } else {
                        "0".to_string()
                    });
                    ui.end_row();
                    ui.label("最大ループ数");
                    ui.label(format!("{} (N={}, k={})", result.max_cycles,
                        result.max_cycles_cell.0, result.max_cycles_cell.1));
                    ui.end_row();
                    ui.label("時間"); ui.label(format!("{:.2}s", result.elapsed_s)); ui.end_row();
                });

                ui.separator();
                Self::draw_cycle_hist(ui, &result.cycle_hist);

                if let Some(ref path) = result.save_path {
                    ui.colored_label(egui::Color32::GREEN, format!("保存: {}", path));
                }
            });
        }
    }

    // ─── 共通: ループ数ヒストグラム描画 ──────────────
    fn draw_cycle_hist(ui: &mut egui::Ui, hist: &[u64]) {
        let bars: Vec<Bar> = hist.iter().enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(cycles, &c)| Bar::new(cycles as f64, c as f64))
            .collect();
        if !bars.is_empty() {
            ui.label("ループ数分布");
            Plot::new("sweep_hist")
                .height(140.0)
                .allow_drag(false)
                .allow_zoom(false)
                .x_axis_label("ループ数")
                .y_axis_label("セル数")
                .show(ui, |plot_ui| {
                    plot_ui.bar_chart(BarChart::new(bars).width(0.8));
                });
        }

        ui.collapsing("ループ数分布 詳細", |ui| {
            egui::Grid::new("sweep_hist_detail").striped(true).show(ui, |ui| {
                ui.label("ループ数"); ui.label("セル数"); ui.end_row();
                for (cycles, &count) in hist.iter().enumerate() {
                    if count > 0 {
                        ui.label(format!("{}", cycles));
                        ui.label(format!("{}", count));
                        ui.end_row();
                    }
                }
            });
        });
    }

    // ─── 計算実行 ──────────────────────────────

    fn start_sweep(&mut self) {
        let n_lo = match self.sweep_n_lo_input.trim().parse::<u64>() { Ok(v) => v, Err(_) => return };
        let n_hi = match self.sweep_n_hi_input.trim().parse::<u64>() { Ok(v) => v, Err(_) => return };
        let k_lo = match self.sweep_k_lo_input.trim().parse::<u64>() { Ok(v) => v, Err(_) => return };
        let k_hi = match self.sweep_k_hi_input.trim().parse::<u64>() { Ok(v) => v, Err(_) => return };

        self.sweep_cancel.store(false, Ordering::Relaxed);
        {
            let mut s = self.sweep_state.lock().unwrap();
            s.running = true; s.done = 0; s.total = 0; s.cps = 0.0; s.elapsed_s = 0.0; s.result = None;
        }
        let state = self.sweep_state.clone();
        let cancel = self.sweep_cancel.clone();

        thread::spawn(move || {
            // パニック時も running = false を保証するガード
            let state_guard = state.clone();
            struct RunGuard(Arc<Mutex<SweepState>>);
            impl Drop for RunGuard {
                fn drop(&mut self) {
                    if let Ok(mut s) = self.0.lock() {
                        s.running = false;
                    }
                }
            }
            let _guard = RunGuard(state_guard);

            let timer = Instant::now();
            let state_cb = state.clone();
            let last_update = Mutex::new(Instant::now());
            let result = sweep_grid_parallel_cancellable(n_lo, n_hi, k_lo, k_hi, &cancel, |done, total| {
                let now = Instant::now();
                if let Ok(mut lu) = last_update.try_lock() {
                    if now.duration_since(*lu).as_millis() >= 200 {
                        let elapsed = timer.elapsed();
                        let mut s = state_cb.lock().unwrap();
                        s.done = done; s.total = total;
                        s.elapsed_s = elapsed.as_secs_f64();
                        s.cps = if elapsed.as_secs_f64() > 0.0 { done as f64 / elapsed.as_secs_f64() } else { 0.0 };
                        *lu = now;
                    }
                }
            });
            let elapsed = timer.elapsed();
            let cancelled = cancel.load(Ordering::Relaxed);

            let mut s = state.lock().unwrap();
            s.running = false;
            match result {
                Ok(stats) => {
                    let save_path = save_sweep_log(n_lo, n_hi, k_lo, k_hi, &stats, cancelled, elapsed);
                    s.result = Some(SweepResultDisplay {
                        cells: stats.cells,
                        single_loop_cells: stats.single_loop_cells,
                        max_cycles: stats.max_cycles,
                        max_cycles_cell: stats.max_cycles_cell,
                        cancelled,
                        cycle_hist: stats.cycle_hist,
                        elapsed_s: elapsed.as_secs_f64(),
                        save_path,
                    });
                }
                Err(_) => {
                    // 範囲指定が不正: 空の結果として表示
                    s.result = Some(SweepResultDisplay {
                        cells: 0,
                        single_loop_cells: 0,
                        max_cycles: 0,
                        max_cycles_cell: (0, 0),
                        cancelled: false,
                        cycle_hist: Vec::new(),
                        elapsed_s: 0.0,
                        save_path: None,
                    });
                }
            }
        });
    }
}

// ─── ログ保存 ───────────────────────────────────

fn save_sweep_log(
    n_lo: u64, n_hi: u64, k_lo: u64, k_hi: u64,
    stats: &SweepStats, cancelled: bool, elapsed: std::time::Duration,
) -> Option<String> {
    let ts = timestamp();
    let tag = if cancelled { "_stopped" } else { "" };
    let filename = format!("gui_sweep_N{}-{}_k{}-{}{}_{}.txt", n_lo, n_hi, k_lo, k_hi, tag, ts);
    let path = output_dir().join(&filename);
    if let Ok(mut f) = File::create(&path) {
        writeln!(f, "# modmul-threadart sweep{}", if cancelled { " (stopped)" } else { "" }).ok();
        writeln!(f, "n_range = [{}, {}]", n_lo, n_hi).ok();
        writeln!(f, "k_range = [{}, {}]", k_lo, k_hi).ok();
        writeln!(f, "cells = {}", stats.cells).ok();
        writeln!(f, "single_loop_cells = {}", stats.single_loop_cells).ok();
        writeln!(f, "max_cycles = {}", stats.max_cycles).ok();
        writeln!(f, "max_cycles_cell = ({}, {})", stats.max_cycles_cell.0, stats.max_cycles_cell.1).ok();
        if cancelled { writeln!(f, "cancelled = true").ok(); }
        writeln!(f, "").ok();
        writeln!(f, "# Cycle count histogram (cycles: cells)").ok();
        for (cycles, &count) in stats.cycle_hist.iter().enumerate() {
            if count > 0 { writeln!(f, "{}: {}", cycles, count).ok(); }
        }
        writeln!(f, "elapsed = {:?}", elapsed).ok();
        return Some(path.display().to_string());
    }
    None
}
