/// 提示層が所有するフレーム状態機械。
///
/// `frame` は次に描くアクティブ弦の添字（= 描画済みプレフィックス長 m）。
/// エンジンは時間も状態も持たないため、コマ送り・自動再生の進行は
/// この構造体を呼び出し側が保持して `frame_view` に渡す。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameState {
    pub frame: u64,
    pub auto_play: bool,
}

impl FrameState {
    pub fn new() -> Self {
        FrameState { frame: 0, auto_play: false }
    }

    /// 前へ: デクリメント、下限 0。
    pub fn previous(&mut self) {
        self.frame = self.frame.saturating_sub(1);
    }

    /// 次へ: インクリメント、上限 N−1。上限到達で自動再生は停止する。
    pub fn next(&mut self, n: u64) {
        let ceiling = n.saturating_sub(1);
        if self.frame < ceiling {
            self.frame += 1;
        }
        if self.frame >= ceiling {
            self.auto_play = false;
        }
    }

    /// 自動再生開始。
    pub fn play(&mut self) {
        self.auto_play = true;
    }

    /// 自動再生停止。
    pub fn stop(&mut self) {
        self.auto_play = false;
    }

    /// N 変更時の再クランプ。
    pub fn clamp(&mut self, n: u64) {
        let ceiling = n.saturating_sub(1);
        if self.frame > ceiling {
            self.frame = ceiling;
        }
    }
}

impl Default for FrameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_previous_floor() {
        let mut s = FrameState::new();
        s.previous();
        assert_eq!(s.frame, 0);
    }

    #[test]
    fn test_next_ceiling_stops_autoplay() {
        let mut s = FrameState::new();
        s.play();
        for _ in 0..10 {
            s.next(5);
        }
        assert_eq!(s.frame, 4);
        assert!(!s.auto_play);
    }

    #[test]
    fn test_reclamp_on_n_change() {
        let mut s = FrameState { frame: 150, auto_play: false };
        s.clamp(60);
        assert_eq!(s.frame, 59);
        s.clamp(200);
        assert_eq!(s.frame, 59);
    }
}
