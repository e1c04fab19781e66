// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

use proptest::prelude::*;

use sanforge::assembler::{assemble_source, SessionConfig};
use sanforge::core::error::EncodeErrorKind;
use sanforge::core::operand::{OperandSource, OperandStack, SuppliedOperand};
use sanforge::core::sink::{CodeBuffer, OutputSink, StreamSink};
use sanforge::families::mos6502::directives::{back_branch, mark, push_accumulator};
use sanforge::families::mos6502::{
    instruction_length, lookup_opcode, DispatchTable, EncodeMode, Encoder, JumpSite, JumpTagger,
    MnemonicIndex, MnemonicWords,
};

#[test]
fn dispatch_entries_encode_their_opcodes() {
    let table = DispatchTable::new(0xA000);
    let mut encoder = Encoder::new(EncodeMode::Checked);
    let mut buffer = CodeBuffer::new(0x0800);
    let mut stack: OperandStack = [0x1234, 0x42].into_iter().collect();

    let lda_imm = table.slot_for_opcode(0xA9);
    let lda_abs = table.slot_for_opcode(0xAD);
    table
        .invoke(lda_imm, &mut encoder, &mut stack, &mut buffer)
        .expect("lda.#");
    table
        .invoke(lda_abs, &mut encoder, &mut stack, &mut buffer)
        .expect("lda");
    assert_eq!(buffer.bytes(), &[0xA9, 0x42, 0xAD, 0x34, 0x12]);
    assert!(stack.is_empty());
}

#[test]
fn names_resolve_from_both_directions() {
    let table = DispatchTable::new(0x9000);
    let words = MnemonicWords::new(&table);
    let index = MnemonicIndex::shared();
    for entry in sanforge::families::mos6502::FAMILY_INSTRUCTION_TABLE {
        let word = words.resolve(entry.opcode).expect("word");
        assert_eq!(word.name, entry.mnemonic);
        assert_eq!(index.name_for(entry.opcode), Some(entry.mnemonic));
        assert_eq!(index.opcode_for(entry.mnemonic), Some(entry.opcode));
    }
    assert!(words.resolve(0x03).is_none());
}

#[test]
fn jump_tagger_sees_every_absolute_jump() {
    let mut sites = Vec::new();
    {
        let mut encoder =
            Encoder::with_jump_compiler(EncodeMode::Checked, JumpTagger::new(|site| sites.push(site)));
        let mut sink = StreamSink::new(Vec::new(), 0x0200);
        let mut target = SuppliedOperand::new(0x0300);
        encoder.encode(0x4C, &mut target, &mut sink).expect("jmp");
        assert!(target.is_consumed());
        assert_eq!(sink.into_inner(), vec![0x4C, 0x00, 0x03]);
    }
    assert_eq!(
        sites,
        vec![JumpSite {
            address: 0x0200,
            target: 0x0300
        }]
    );
}

#[test]
fn jump_without_target_emits_nothing() {
    let mut encoder = Encoder::default();
    let mut buffer = CodeBuffer::new(0);
    let err = encoder
        .encode(0x4C, &mut OperandStack::new(), &mut buffer)
        .unwrap_err();
    assert_eq!(err.kind(), EncodeErrorKind::Underflow);
    assert!(buffer.is_empty());
}

#[test]
fn hand_built_loop_matches_session_output() {
    let mut buffer = CodeBuffer::new(0x1000);
    let mut stack = OperandStack::new();
    let mut encoder = Encoder::new(EncodeMode::Checked);

    push_accumulator(&mut buffer).expect("push-a");
    mark(&mut stack, &buffer);
    encoder.encode(0xCA, &mut stack, &mut buffer).expect("dex");
    back_branch(&mut stack, &buffer, EncodeMode::Checked).expect("<b");
    encoder.encode(0xD0, &mut stack, &mut buffer).expect("bne");

    let report = assemble_source(
        "push-a here dex <b bne",
        SessionConfig {
            origin: 0x1000,
            ..SessionConfig::default()
        },
    )
    .expect("assemble");
    assert_eq!(report.bytes(), buffer.bytes());
    assert_eq!(buffer.here(), 0x1009);
}

proptest! {
    #[test]
    fn encoded_length_matches_classifier(opcode in any::<u8>(), operand in 0u16..=0xff) {
        let mut encoder = Encoder::new(EncodeMode::Checked);
        let mut buffer = CodeBuffer::new(0);
        let mut stack: OperandStack = [operand].into_iter().collect();
        let emitted = encoder.encode(opcode, &mut stack, &mut buffer).expect("encode");
        prop_assert_eq!(emitted, instruction_length(opcode) as usize);
        prop_assert_eq!(buffer.len(), emitted);
        prop_assert_eq!(stack.depth(), usize::from(emitted == 1));
        if let Some(entry) = lookup_opcode(opcode) {
            prop_assert_eq!(entry.length() as usize, emitted);
        }
    }
}
