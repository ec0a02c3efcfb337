use arcis_imports::*;

#[encrypted]
mod circuits {
    use arcis_imports::*;

    /// Decides a duel between two sealed moves: 0 = rock, 1 = paper, 2 = scissors.
    ///
    /// Each move is encrypted by its player against the MXE. Only the outcome is revealed, as
    /// `(is_draw, player1_wins)`; the moves themselves stay secret.
    ///
    /// A move outside 0..=2 forfeits: the other player wins, and two invalid moves draw.
    #[instruction]
    pub fn resolve_game(move1_ctxt: Enc<Shared, u8>, move2_ctxt: Enc<Shared, u8>) -> (bool, bool) {
        let move1 = move1_ctxt.to_arcis();
        let move2 = move2_ctxt.to_arcis();

        let valid1 = move1 < 3;
        let valid2 = move2 < 3;

        // Rock beats scissors, paper beats rock, scissors beats paper
        let beats = (move1 == 0 && move2 == 2)
            || (move1 == 1 && move2 == 0)
            || (move1 == 2 && move2 == 1);

        // Both branches are always evaluated, there is no early return in a circuit
        let is_draw = if valid1 && valid2 {
            move1 == move2
        } else {
            !valid1 && !valid2
        };
        let player1_wins = if valid1 && valid2 { beats } else { valid1 && !valid2 };

        (is_draw.reveal(), player1_wins.reveal())
    }
}
