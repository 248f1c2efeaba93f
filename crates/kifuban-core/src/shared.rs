//! スレッド間で共有する局面

use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

use crate::board::Board;

/// 局面ごとに1つのロックを持つ共有ハンドル
///
/// 詰み判定などの解析は `snapshot` で得た複製に対して行い、ロックを長く保持しないこと。
#[derive(Debug, Clone, Default)]
pub struct SharedBoard {
    inner: Arc<Mutex<Board>>,
}

impl SharedBoard {
    pub fn new(board: Board) -> Self {
        SharedBoard {
            inner: Arc::new(Mutex::new(board)),
        }
    }

    /// ロックを取って読み取る
    pub fn read<R>(&self, f: impl FnOnce(&Board) -> R) -> R {
        f(&self.inner.lock())
    }

    /// ロックを取って変更する
    pub fn write<R>(&self, f: impl FnOnce(&mut Board) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// ガードを直接得る
    pub fn lock(&self) -> MutexGuard<'_, Board> {
        self.inner.lock()
    }

    /// 現在の局面の複製
    pub fn snapshot(&self) -> Board {
        self.inner.lock().clone()
    }
}

impl From<Board> for SharedBoard {
    fn from(board: Board) -> Self {
        SharedBoard::new(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AppliedMove, Piece, Side, Square};
    use std::thread;

    #[test]
    fn test_shared_board_across_threads() {
        let shared = SharedBoard::new(Board::startpos());
        let mv = AppliedMove::normal(
            Side::Black,
            Square::new(7, 7).unwrap(),
            Square::new(7, 6).unwrap(),
            Piece::PAWN,
            false,
        );

        let writer = {
            let shared = shared.clone();
            thread::spawn(move || shared.write(|board| board.do_move(mv)))
        };
        writer.join().unwrap().unwrap();

        assert_eq!(shared.read(|board| board.turn()), Side::White);
        let snapshot = shared.snapshot();
        shared.write(|board| board.undo());
        assert_eq!(snapshot.move_count(), 1);
        assert_eq!(shared.read(Board::move_count), 0);
    }
}
