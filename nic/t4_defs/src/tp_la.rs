// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Field tables for the TP logic-analyzer capture.
//!
//! Mode 0/1 captures carry one [`TP_LA0`] word per event. Mode 3 captures
//! carry two words; the second decodes against [`TP_LA1`] or [`TP_LA2`]
//! depending on bit 17 of the first word (set when the event carries an
//! MPS VF classification instead of a CPL command trace).

use bitfmt::FieldDesc;

const fn f(name: &'static str, start: u32, width: u32) -> FieldDesc {
    FieldDesc { name, start, width }
}

/// First (or only) capture word.
pub static TP_LA0: &[FieldDesc] = &[
    f("RcfOpCodeOut", 60, 4),
    f("State", 56, 4),
    f("WcfState", 52, 4),
    f("RcfOpcSrcOut", 50, 2),
    f("CRxError", 49, 1),
    f("ERxError", 48, 1),
    f("SanityFailed", 47, 1),
    f("SpuriousMsg", 46, 1),
    f("FlushInputMsg", 45, 1),
    f("FlushInputCpl", 44, 1),
    f("RssUpBit", 43, 1),
    f("RssFilterHit", 42, 1),
    f("Tid", 32, 10),
    f("InitTcb", 31, 1),
    f("LineNumber", 24, 7),
    f("Emsg", 23, 1),
    f("EdataOut", 22, 1),
    f("Cmsg", 21, 1),
    f("CdataOut", 20, 1),
    f("EreadPdu", 19, 1),
    f("CreadPdu", 18, 1),
    f("TunnelPkt", 17, 1),
    f("RcfPeerFin", 16, 1),
    f("RcfReasonOut", 12, 4),
    f("TxCchannel", 10, 2),
    f("RcfTxChannel", 8, 2),
    f("RxEchannel", 6, 2),
    f("RcfRxChannel", 5, 1),
    f("RcfDataOutSrdy", 4, 1),
    f("RxDvld", 3, 1),
    f("RxOoDvld", 2, 1),
    f("RxCongestion", 1, 1),
    f("TxCongestion", 0, 1),
];

/// Second capture word, CPL command trace variant.
pub static TP_LA1: &[FieldDesc] = &[
    f("CplCmdIn", 56, 8),
    f("CplCmdOut", 48, 8),
    f("ESynOut", 47, 1),
    f("EAckOut", 46, 1),
    f("EFinOut", 45, 1),
    f("ERstOut", 44, 1),
    f("SynIn", 43, 1),
    f("AckIn", 42, 1),
    f("FinIn", 41, 1),
    f("RstIn", 40, 1),
    f("DataIn", 39, 1),
    f("DataInVld", 38, 1),
    f("PadIn", 37, 1),
    f("RxBufEmpty", 36, 1),
    f("RxDdp", 35, 1),
    f("RxFbCongestion", 34, 1),
    f("TxFbCongestion", 33, 1),
    f("TxPktSumSrdy", 32, 1),
    f("RcfUlpType", 28, 4),
    f("Eread", 27, 1),
    f("Ebypass", 26, 1),
    f("Esave", 25, 1),
    f("Static0", 24, 1),
    f("Cread", 23, 1),
    f("Cbypass", 22, 1),
    f("Csave", 21, 1),
    f("CPktOut", 20, 1),
    f("RxPagePoolFull", 18, 2),
    f("RxLpbkPkt", 17, 1),
    f("TxLpbkPkt", 16, 1),
    f("RxVfValid", 15, 1),
    f("SynLearned", 14, 1),
    f("SetDelEntry", 13, 1),
    f("SetInvEntry", 12, 1),
    f("CpcmdDvld", 11, 1),
    f("CpcmdSave", 10, 1),
    f("RxPstructsFull", 8, 2),
    f("EpcmdDvld", 7, 1),
    f("EpcmdFlush", 6, 1),
    f("EpcmdTrimPrefix", 5, 1),
    f("EpcmdTrimPostfix", 4, 1),
    f("ERssIp4Pkt", 3, 1),
    f("ERssIp6Pkt", 2, 1),
    f("ERssTcpUdpPkt", 1, 1),
    f("ERssFceFipPkt", 0, 1),
];

/// Second capture word, MPS VF classification variant.
pub static TP_LA2: &[FieldDesc] = &[
    f("CplCmdIn", 56, 8),
    f("MpsVfVld", 55, 1),
    f("MpsPf", 52, 3),
    f("MpsVf", 44, 8),
    f("SynIn", 43, 1),
    f("AckIn", 42, 1),
    f("FinIn", 41, 1),
    f("RstIn", 40, 1),
    f("DataIn", 39, 1),
    f("DataInVld", 38, 1),
    f("PadIn", 37, 1),
    f("RxBufEmpty", 36, 1),
    f("RxDdp", 35, 1),
    f("RxFbCongestion", 34, 1),
    f("TxFbCongestion", 33, 1),
    f("TxPktSumSrdy", 32, 1),
    f("RcfUlpType", 28, 4),
    f("Eread", 27, 1),
    f("Ebypass", 26, 1),
    f("Esave", 25, 1),
    f("Static0", 24, 1),
    f("Cread", 23, 1),
    f("Cbypass", 22, 1),
    f("Csave", 21, 1),
    f("CPktOut", 20, 1),
    f("RxPagePoolFull", 18, 2),
    f("RxLpbkPkt", 17, 1),
    f("TxLpbkPkt", 16, 1),
    f("RxVfValid", 15, 1),
    f("SynLearned", 14, 1),
    f("SetDelEntry", 13, 1),
    f("SetInvEntry", 12, 1),
    f("CpcmdDvld", 11, 1),
    f("CpcmdSave", 10, 1),
    f("RxPstructsFull", 8, 2),
    f("EpcmdDvld", 7, 1),
    f("EpcmdFlush", 6, 1),
    f("EpcmdTrimPrefix", 5, 1),
    f("EpcmdTrimPostfix", 4, 1),
    f("ERssIp4Pkt", 3, 1),
    f("ERssIp6Pkt", 2, 1),
    f("ERssTcpUdpPkt", 1, 1),
    f("ERssFceFipPkt", 0, 1),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_decode_cleanly() {
        for table in [TP_LA0, TP_LA1, TP_LA2] {
            bitfmt::decode(u64::MAX, table).unwrap();
        }
    }
}
