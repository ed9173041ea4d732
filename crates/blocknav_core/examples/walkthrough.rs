//! End-to-end tour: navigate two stacks, enter a block, pair two
//! connections, and watch the duplicate host notice digest to nothing.
//!
//! ```sh
//! cargo run --example walkthrough
//! RUST_LOG=debug cargo run --example walkthrough
//! ```

use blocknav_core::{
    BlockFacets, Command, EffectSet, EndpointLoc, EndpointRef, FieldRef, HostGraph,
    JoinRejection, MutationEvent, NavConfig, NavSession, StableId,
};
use blocknav_mirror::{BlockNode, BlockTree};

/// The smallest honest canvas: ordered stacks of (identity, kind).
struct DemoCanvas {
    stacks: Vec<Vec<(StableId, &'static str)>>,
}

impl HostGraph for DemoCanvas {
    fn serialize(&self) -> BlockTree {
        let roots = self
            .stacks
            .iter()
            .map(|stack| {
                let mut bottom_up = stack.iter().rev();
                let (id, kind) = bottom_up.next().expect("non-empty stack");
                let mut node = BlockNode::new(*id, *kind);
                for (id, kind) in bottom_up {
                    node = BlockNode::new(*id, *kind).with_next(node);
                }
                node
            })
            .collect();
        BlockTree::with_roots(roots)
    }

    fn describe_block(&self, block: StableId) -> Option<BlockFacets> {
        self.stacks.iter().flatten().find(|(id, _)| *id == block)?;
        Some(BlockFacets {
            has_previous_connection: true,
            has_next_connection: true,
            inputs: Vec::new(),
        })
    }

    fn selected_block(&self) -> Option<StableId> {
        None
    }

    fn attempt_join(&mut self, a: &EndpointRef, b: &EndpointRef) -> Result<(), JoinRejection> {
        let (socket, plug) = match (&a.loc, &b.loc) {
            (EndpointLoc::Next, EndpointLoc::Previous) => (a.block, b.block),
            (EndpointLoc::Previous, EndpointLoc::Next) => (b.block, a.block),
            _ => return Err(JoinRejection::new("demo host only joins stacks")),
        };
        let from = self
            .stacks
            .iter()
            .position(|stack| stack.last().map(|(id, _)| *id) == Some(socket));
        let to = self
            .stacks
            .iter()
            .position(|stack| stack.first().map(|(id, _)| *id) == Some(plug));
        match (from, to) {
            (Some(from), Some(to)) if from != to => {
                let moved = self.stacks.remove(to);
                let from = if to < from { from - 1 } else { from };
                self.stacks[from].extend(moved);
                Ok(())
            }
            _ => Err(JoinRejection::new("endpoints must be a stack tail and a stack head")),
        }
    }

    fn split(&mut self, _endpoint: &EndpointRef) {}

    fn open_editor(&mut self, field: &FieldRef) {
        println!("      (editor opens for field {} on block {})", field.field, field.block);
    }
}

fn announce(session: &NavSession, effects: EffectSet) {
    let place = session
        .current_block()
        .and_then(|id| {
            let mirror = session.mirror();
            let idx = mirror.find_identity(id)?;
            Some(format!("{} (block {id})", mirror.label(idx).unwrap_or("?")))
        })
        .unwrap_or_else(|| "nothing selected".to_string());
    println!("   -> {place}  [{effects:?}]");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut canvas = DemoCanvas {
        stacks: vec![
            vec![(1, "when_run"), (2, "move_forward"), (3, "turn_left")],
            vec![(4, "play_sound")],
        ],
    };

    let mut session = NavSession::new(NavConfig::default());
    println!("sync");
    let effects = session.sync(&mut canvas)?;
    announce(&session, effects);

    println!("walk the first stack, wrapping at the bottom");
    for _ in 0..3 {
        let effects = session.execute(&mut canvas, Command::MoveDown)?;
        announce(&session, effects);
    }

    println!("store the previous connection of the lone block");
    session.execute(&mut canvas, Command::JumpToContainer(1))?;
    session.execute(&mut canvas, Command::EnterBlock)?;
    session.execute(&mut canvas, Command::SlotNext)?;
    let effects = session.execute(&mut canvas, Command::PairConnection)?;
    announce(&session, effects);

    println!("pair it with the bottom of the first stack");
    session.execute(&mut canvas, Command::JumpToContainer(0))?;
    session.execute(&mut canvas, Command::JumpToBottom)?;
    session.execute(&mut canvas, Command::EnterBlock)?;
    let effects = session.execute(&mut canvas, Command::PairConnection)?;
    announce(&session, effects);
    println!("   containers now: {}", session.mirror().container_count());

    println!("the host's own joined notice arrives late and digests to nothing");
    let effects = session.on_mutation(&mut canvas, MutationEvent::ConnectionJoined)?;
    announce(&session, effects);

    println!("\nsession log:\n{}", session.log().to_dsl());
    Ok(())
}
