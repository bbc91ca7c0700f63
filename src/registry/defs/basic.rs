//! Basic criteria — fundamentals: growth, profitability, valuation, health
//!
//! Note: the dividend family intentionally carries two entries with the same
//! label ("Cổ tức bằng tiền (năm gần nhất)") under different ids. This
//! mirrors the upstream catalogue; registry validation reports it instead of
//! deduping, because favorites persistence matches on labels.

use super::{flag, range_sub};
use crate::registry::criterion::{CriterionDef, Group, Scale};

const G: Group = Group::Basic;

pub(crate) fn definitions() -> Vec<CriterionDef> {
    let mut defs = Vec::new();
    defs.extend(growth());
    defs.extend(profitability());
    defs.extend(valuation());
    defs.extend(health());
    defs.extend(per_share());
    defs.extend(dividend());
    defs.extend(size());
    defs
}

fn growth() -> Vec<CriterionDef> {
    let fam = ("tang_truong", "Tăng trưởng");
    let pct = |id: &str, label: &str, key: &str| {
        range_sub(G, fam, id, label, key, Scale::Percent, Some("%"), (-100.0, 300.0))
    };
    vec![
        pct(
            "tang_truong_doanh_thu_quy",
            "Tăng trưởng doanh thu quý gần nhất (QoQ)",
            "RevenueGrowthQoQ",
        ),
        pct(
            "tang_truong_doanh_thu_nam",
            "Tăng trưởng doanh thu (YoY)",
            "RevenueGrowthYoY",
        ),
        pct(
            "tang_truong_loi_nhuan_quy",
            "Tăng trưởng lợi nhuận quý gần nhất (QoQ)",
            "ProfitGrowthQoQ",
        ),
        pct(
            "tang_truong_loi_nhuan_nam",
            "Tăng trưởng lợi nhuận (YoY)",
            "ProfitGrowthYoY",
        ),
        pct(
            "tang_truong_eps_nam",
            "Tăng trưởng EPS (YoY)",
            "EPSGrowthYoY",
        ),
        pct(
            "tang_truong_doanh_thu_3_nam",
            "Tăng trưởng doanh thu kép 3 năm",
            "RevenueCAGR3Y",
        ),
        pct(
            "tang_truong_loi_nhuan_3_nam",
            "Tăng trưởng lợi nhuận kép 3 năm",
            "ProfitCAGR3Y",
        ),
    ]
}

fn profitability() -> Vec<CriterionDef> {
    let fam = ("sinh_loi", "Khả năng sinh lời");
    let pct = |id: &str, label: &str, key: &str| {
        range_sub(G, fam, id, label, key, Scale::Percent, Some("%"), (0.0, 100.0))
    };
    vec![
        pct("roe_basic", "ROE", "ROE"),
        pct("roa_basic", "ROA", "ROA"),
        pct("roic_basic", "ROIC", "ROIC"),
        pct("bien_loi_nhuan_gop", "Biên lợi nhuận gộp", "GrossMargin"),
        pct("bien_loi_nhuan_rong", "Biên lợi nhuận ròng", "NetMargin"),
        pct(
            "bien_loi_nhuan_hoat_dong",
            "Biên lợi nhuận hoạt động",
            "OperatingMargin",
        ),
        pct("bien_ebitda", "Biên EBITDA", "EBITDAMargin"),
    ]
}

fn valuation() -> Vec<CriterionDef> {
    let fam = ("dinh_gia_co_ban", "Định giá");
    let plain = |id: &str, label: &str, key: &str, hi: f64| {
        range_sub(G, fam, id, label, key, Scale::None, None, (0.0, hi))
    };
    vec![
        plain("pe_basic", "P/E", "PE", 100.0),
        plain("pb_basic", "P/B", "PB", 20.0),
        plain("ps_basic", "P/S", "PS", 30.0),
        plain("ev_ebitda_basic", "EV/EBITDA", "EVEBITDA", 50.0),
        plain("peg_basic", "PEG", "PEG", 10.0),
    ]
}

fn health() -> Vec<CriterionDef> {
    let fam = ("suc_khoe_tai_chinh", "Sức khỏe tài chính");
    let plain = |id: &str, label: &str, key: &str, hi: f64| {
        range_sub(G, fam, id, label, key, Scale::None, None, (0.0, hi))
    };
    vec![
        plain("no_tren_von_chu", "Nợ / Vốn chủ sở hữu", "DebtOnEquity", 10.0),
        plain(
            "thanh_toan_hien_hanh",
            "Khả năng thanh toán hiện hành",
            "CurrentRatio",
            10.0,
        ),
        plain(
            "thanh_toan_nhanh",
            "Khả năng thanh toán nhanh",
            "QuickRatio",
            10.0,
        ),
        plain(
            "kha_nang_tra_lai_vay",
            "Khả năng trả lãi vay",
            "InterestCoverage",
            50.0,
        ),
        plain("ty_le_tien_mat", "Tỷ lệ tiền mặt", "CashRatio", 5.0),
        flag(
            G,
            fam,
            "kiem_toan_chap_nhan_toan_phan",
            "Kiểm toán chấp nhận toàn phần",
            "AuditAccepted",
        ),
    ]
}

fn per_share() -> Vec<CriterionDef> {
    let fam = ("tren_mot_co_phieu", "Chỉ số trên một cổ phiếu");
    let vnd = |id: &str, label: &str, key: &str, hi: f64| {
        range_sub(G, fam, id, label, key, Scale::None, Some("VND"), (0.0, hi))
    };
    vec![
        vnd("gia_tri_so_sach", "Giá trị sổ sách (BVPS)", "BVPS", 200_000.0),
        vnd(
            "doanh_thu_tren_co_phieu",
            "Doanh thu trên cổ phiếu",
            "SalesPerShare",
            500_000.0,
        ),
        vnd(
            "tien_mat_tren_co_phieu",
            "Tiền mặt trên cổ phiếu",
            "CashPerShare",
            100_000.0,
        ),
        vnd("eps_basic", "EPS (4 quý gần nhất)", "EPS", 20_000.0),
    ]
}

fn dividend() -> Vec<CriterionDef> {
    let fam = ("co_tuc_co_ban", "Cổ tức");
    vec![
        range_sub(
            G,
            fam,
            "ty_suat_co_tuc_basic",
            "Tỷ suất cổ tức",
            "DividendYield",
            Scale::Percent,
            Some("%"),
            (0.0, 30.0),
        ),
        // duplicate-label pair, see module docs
        range_sub(
            G,
            fam,
            "co_tuc_bang_tien_nam_gan_nhat",
            "Cổ tức bằng tiền (năm gần nhất)",
            "DividendCash",
            Scale::None,
            Some("VND"),
            (0.0, 10_000.0),
        ),
        range_sub(
            G,
            fam,
            "co_tuc_bang_tien_nam_gan_nhat_2",
            "Cổ tức bằng tiền (năm gần nhất)",
            "DividendCashTrailing",
            Scale::None,
            Some("VND"),
            (0.0, 10_000.0),
        ),
        range_sub(
            G,
            fam,
            "so_nam_tra_co_tuc_lien_tuc",
            "Số năm trả cổ tức liên tục",
            "DividendYears",
            Scale::None,
            Some("Năm"),
            (0.0, 20.0),
        ),
    ]
}

fn size() -> Vec<CriterionDef> {
    let fam = ("quy_mo_co_ban", "Quy mô");
    let billion = |id: &str, label: &str, key: &str, hi: f64| {
        range_sub(G, fam, id, label, key, Scale::Billion, Some("Tỷ"), (0.0, hi))
    };
    vec![
        billion("von_dieu_le", "Vốn điều lệ", "CharterCapital", 200_000.0),
        billion("tong_tai_san", "Tổng tài sản", "TotalAssets", 2_000_000.0),
        billion(
            "doanh_thu_4_quy",
            "Doanh thu 4 quý gần nhất",
            "RevenueTTM",
            1_000_000.0,
        ),
        billion(
            "loi_nhuan_4_quy",
            "Lợi nhuận sau thuế 4 quý gần nhất",
            "NetProfitTTM",
            200_000.0,
        ),
    ]
}
