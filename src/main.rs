use modmul_threadart::*;
use std::env;
use std::fs::File;
use std::io::{BufWriter, Write as IoWrite};
use std::path::PathBuf;
use std::time::Instant;

fn print_usage() {
    eprintln!("剰余乗算糸掛けアート: end = (i × k) mod N / 焦点ループ数 gcd(N, k−1)");
    eprintln!();
    eprintln!("使い方:");
    eprintln!("  modmul-threadart draw <N> <k> [frame]          弦列を生成して SVG/CSV 出力");
    eprintln!("  modmul-threadart cycles <N> <k>                ループ数と不動点の表示");
    eprintln!("  modmul-threadart sweep <N1> <N2> <k1> <k2>     格子掃引でループ数を集計");
    eprintln!();
    eprintln!("結果は自動的に output/ フォルダに保存されます。");
    eprintln!();
    eprintln!("例:");
    eprintln!("  modmul-threadart draw 60 7          N=60, k=7 の完成図");
    eprintln!("  modmul-threadart draw 60 7 25       弦25本まで (26本目がアクティブ)");
    eprintln!("  modmul-threadart cycles 37 9        gcd(37, 8) = 1 → 単一ループ");
    eprintln!("  modmul-threadart sweep 2 200 1 50   UI 全域の掃引");
}

fn output_dir() -> PathBuf {
    let dir = PathBuf::from("output");
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

fn enable_ansi() {
    #[cfg(windows)]
    {
        use std::os::windows::io::AsRawHandle;
        use std::io::IsTerminal;
        let stderr = std::io::stderr();
        if stderr.is_terminal() {
            unsafe {
                let handle = stderr.as_raw_handle();
                let mut mode: u32 = 0;
                extern "system" {
                    fn GetConsoleMode(h: *mut std::ffi::c_void, m: *mut u32) -> i32;
                    fn SetConsoleMode(h: *mut std::ffi::c_void, m: u32) -> i32;
                }
                if GetConsoleMode(handle, &mut mode) != 0 {
                    SetConsoleMode(handle, mode | 0x0004);
                }
            }
        }
    }
}

fn main() {
    enable_ansi();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "draw" => cmd_draw(&args[2..]),
        "cycles" => cmd_cycles(&args[2..]),
        "sweep" => cmd_sweep(&args[2..]),
        _ => {
            eprintln!("不明なコマンド: {}", args[1]);
            print_usage();
        }
    }
}

fn parse_u64(s: &str, name: &str) -> u64 {
    s.parse::<u64>().unwrap_or_else(|_| {
        eprintln!("{} を解析できません: {}", name, s);
        std::process::exit(1);
    })
}

fn fail(e: InvalidParameter) -> ! {
    eprintln!("パラメータエラー: {}", e);
    std::process::exit(1);
}

fn cmd_draw(args: &[String]) {
    if args.len() < 2 {
        eprintln!("使い方: modmul-threadart draw <N> <k> [frame]");
        return;
    }

    let n = parse_u64(&args[0], "N");
    let k = parse_u64(&args[1], "k");
    let m = if args.len() >= 3 {
        parse_u64(&args[2], "frame")
    } else {
        n
    };

    let timer = Instant::now();
    let view = frame_view(n, k, m).unwrap_or_else(|e| fail(e));
    let cycles = compute_cycle_count(n, k).unwrap_or_else(|e| fail(e));
    let elapsed = timer.elapsed();

    println!("N = {}, k = {}, frame = {}/{}", n, k, m, n);
    println!("焦点ループ数 = gcd({}, {}) = {}", n, k - 1, cycles);
    println!();

    // 弦テーブル（長い場合は中間を省略）
    let show_limit = 50;
    println!("  {:>6}  {:>6}", "start", "end");
    for (i, c) in view.completed.iter().enumerate() {
        if i < show_limit || i >= view.completed.len().saturating_sub(5) {
            println!("  {:>6}  {:>6}", c.start, c.end);
        } else if i == show_limit {
            println!("  ... ({} 本省略) ...", view.completed.len().saturating_sub(show_limit + 5));
        }
    }
    if let Some(c) = view.active {
        println!("  {:>6}  {:>6}  (アクティブ)", c.start, c.end);
    }
    println!();
    println!("計算時間 = {:?}", elapsed);

    // 弦CSV保存
    let csv_name = format!("draw_N{}_k{}_f{}_{}.csv", n, k, m, timestamp());
    let csv_path = output_dir().join(&csv_name);
    if let Ok(file) = File::create(&csv_path) {
        let mut w = BufWriter::new(file);
        writeln!(w, "start,end,state").ok();
        for c in &view.completed {
            writeln!(w, "{},{},completed", c.start, c.end).ok();
        }
        if let Some(c) = view.active {
            writeln!(w, "{},{},active", c.start, c.end).ok();
        }
        w.flush().ok();
        println!("弦CSV保存: {}", csv_path.display());
    }

    // SVG保存
    let svg = render_svg(n, k, m, &RenderOptions::default()).unwrap_or_else(|e| fail(e));
    let svg_name = format!("draw_N{}_k{}_f{}_{}.svg", n, k, m, timestamp());
    let svg_path = output_dir().join(&svg_name);
    if std::fs::write(&svg_path, svg).is_ok() {
        println!("SVG保存: {}", svg_path.display());
    }
}

fn cmd_cycles(args: &[String]) {
    if args.len() < 2 {
        eprintln!("使い方: modmul-threadart cycles <N> <k>");
        return;
    }

    let n = parse_u64(&args[0], "N");
    let k = parse_u64(&args[1], "k");

    let cycles = compute_cycle_count(n, k).unwrap_or_else(|e| fail(e));
    let fixed = fixed_points(n, k).unwrap_or_else(|e| fail(e));

    println!("N = {}, k = {}", n, k);
    println!();
    println!("--- 結果 ---");
    println!("焦点ループ数     = gcd({}, {}) = {}", n, k - 1, cycles);
    println!("N との関係       = {} × {} = {}", cycles, n / cycles, n);
    if cycles == 1 {
        println!("構造             = 全節点を通る単一ループ");
    } else if cycles == n {
        println!("構造             = 全節点が自己ループ (k = 1 退化)");
    }
    println!("不動点 ({} 個)    = {:?}", fixed.len(), fixed);
}

fn cmd_sweep(args: &[String]) {
    if args.len() < 4 {
        eprintln!("使い方: modmul-threadart sweep <N1> <N2> <k1> <k2>");
        return;
    }

    let n_lo = parse_u64(&args[0], "N1");
    let n_hi = parse_u64(&args[1], "N2");
    let k_lo = parse_u64(&args[2], "k1");
    let k_hi = parse_u64(&args[3], "k2");

    let num_threads = rayon::current_num_threads();
    println!("格子掃引: N ∈ [{}, {}], k ∈ [{}, {}]", n_lo, n_hi, k_lo, k_hi);
    println!("({}スレッド並列)", num_threads);
    println!();

    let timer = Instant::now();
    let last_print = std::sync::Mutex::new(Instant::now());
    let result = sweep_grid_parallel(n_lo, n_hi, k_lo, k_hi, |done, total| {
        if total > 0 {
            let now = Instant::now();
            if let Ok(mut lp) = last_print.try_lock() {
                if now.duration_since(*lp).as_millis() >= 500 {
                    let elapsed = timer.elapsed();
                    let pct = done as f64 / total as f64 * 100.0;
                    let cps = done as f64 / elapsed.as_secs_f64();
                    eprint!(
                        "\x1b[2K\r  [{:.1}s] {}/{} ({:.1}%) | {:.0} cells/s",
                        elapsed.as_secs_f64(), done, total, pct, cps
                    );
                    *lp = now;
                }
            }
        }
    })
    .unwrap_or_else(|e| fail(e));
    let elapsed = timer.elapsed();

    eprintln!();
    println!();
    println!("--- 結果 ---");
    println!("走査セル数       = {}", result.cells);
    println!("単一ループのセル = {} ({:.1}%)", result.single_loop_cells,
        result.single_loop_cells as f64 / result.cells as f64 * 100.0);
    println!("最大ループ数     = {} (N={}, k={})", result.max_cycles,
        result.max_cycles_cell.0, result.max_cycles_cell.1);
    println!("ループ数分布:");
    for (cycles, &count) in result.cycle_hist.iter().enumerate() {
        if count > 0 {
            println!("  {:>4}: {} セル", cycles, count);
        }
    }
    println!("計算時間         = {:?}", elapsed);

    // 結果保存
    let filename = format!("sweep_N{}-{}_k{}-{}_{}.txt", n_lo, n_hi, k_lo, k_hi, timestamp());
    let path = output_dir().join(&filename);
    if let Ok(mut f) = File::create(&path) {
        writeln!(f, "# modmul-threadart sweep").ok();
        writeln!(f, "n_range = [{}, {}]", n_lo, n_hi).ok();
        writeln!(f, "k_range = [{}, {}]", k_lo, k_hi).ok();
        writeln!(f, "threads = {}", num_threads).ok();
        writeln!(f, "cells = {}", result.cells).ok();
        writeln!(f, "single_loop_cells = {}", result.single_loop_cells).ok();
        writeln!(f, "max_cycles = {}", result.max_cycles).ok();
        writeln!(f, "max_cycles_cell = ({}, {})", result.max_cycles_cell.0, result.max_cycles_cell.1).ok();
        writeln!(f, "").ok();
        writeln!(f, "# Cycle count histogram (cycles: cells)").ok();
        for (cycles, &count) in result.cycle_hist.iter().enumerate() {
            if count > 0 {
                writeln!(f, "{}: {}", cycles, count).ok();
            }
        }
        writeln!(f, "").ok();
        writeln!(f, "elapsed = {:?}", elapsed).ok();
        println!("\n保存: {}", path.display());
    }
}
