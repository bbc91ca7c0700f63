//! Popular criteria — the headline screeners shown on the first tab

use super::{flag, range_sub};
use crate::registry::criterion::{CriterionDef, Group, Scale};

const G: Group = Group::Popular;

pub(crate) fn definitions() -> Vec<CriterionDef> {
    let quy_mo = ("quy_mo", "Quy mô");
    let dinh_gia = ("dinh_gia", "Định giá");
    let hieu_qua = ("hieu_qua", "Hiệu quả hoạt động");
    let thanh_khoan = ("thanh_khoan", "Thanh khoản");
    let nuoc_ngoai = ("nuoc_ngoai", "Nhà đầu tư nước ngoài");
    let co_tuc = ("co_tuc", "Cổ tức");

    vec![
        range_sub(
            G,
            quy_mo,
            "von_hoa_popular",
            "Vốn hóa",
            "MarketCap",
            Scale::Billion,
            Some("Tỷ"),
            (0.0, 1_000_000.0),
        ),
        range_sub(
            G,
            quy_mo,
            "gia_hien_tai_popular",
            "Thị giá",
            "PriceCurrent",
            Scale::None,
            Some("VND"),
            (0.0, 500_000.0),
        ),
        range_sub(
            G,
            dinh_gia,
            "pe_popular",
            "P/E",
            "PE",
            Scale::None,
            None,
            (0.0, 100.0),
        ),
        range_sub(
            G,
            dinh_gia,
            "pb_popular",
            "P/B",
            "PB",
            Scale::None,
            None,
            (0.0, 20.0),
        ),
        range_sub(
            G,
            dinh_gia,
            "eps_popular",
            "EPS (4 quý gần nhất)",
            "EPS",
            Scale::None,
            Some("VND"),
            (0.0, 20_000.0),
        ),
        range_sub(
            G,
            hieu_qua,
            "roe_popular",
            "ROE",
            "ROE",
            Scale::Percent,
            Some("%"),
            (0.0, 100.0),
        ),
        range_sub(
            G,
            hieu_qua,
            "roa_popular",
            "ROA",
            "ROA",
            Scale::Percent,
            Some("%"),
            (0.0, 100.0),
        ),
        range_sub(
            G,
            thanh_khoan,
            "khoi_luong_giao_dich_tb_10_phien",
            "KLGD trung bình 10 phiên",
            "AvgVolume10D",
            Scale::None,
            Some("CP"),
            (0.0, 10_000_000.0),
        ),
        range_sub(
            G,
            thanh_khoan,
            "gia_tri_giao_dich_popular",
            "Giá trị giao dịch",
            "TradingValue",
            Scale::Billion,
            Some("Tỷ"),
            (0.0, 5_000.0),
        ),
        range_sub(
            G,
            nuoc_ngoai,
            "gia_tri_giao_dich_rong_cua_ndtnn",
            "GTGD ròng của NĐTNN",
            "ForeignBuySellValue_",
            Scale::Billion,
            Some("Tỷ"),
            (-1_000.0, 1_000.0),
        ),
        range_sub(
            G,
            nuoc_ngoai,
            "so_huu_nuoc_ngoai_popular",
            "Tỷ lệ sở hữu nước ngoài",
            "ForeignOwnership",
            Scale::Percent,
            Some("%"),
            (0.0, 100.0),
        ),
        range_sub(
            G,
            nuoc_ngoai,
            "room_nuoc_ngoai_con_lai",
            "Room nước ngoài còn lại",
            "ForeignRoomLeft",
            Scale::Percent,
            Some("%"),
            (0.0, 100.0),
        ),
        range_sub(
            G,
            co_tuc,
            "ty_suat_co_tuc_popular",
            "Tỷ suất cổ tức",
            "DividendYield",
            Scale::Percent,
            Some("%"),
            (0.0, 30.0),
        ),
        range_sub(
            G,
            quy_mo,
            "beta_popular",
            "Beta",
            "Beta",
            Scale::None,
            None,
            (0.0, 3.0),
        ),
        range_sub(
            G,
            quy_mo,
            "ty_le_free_float",
            "Tỷ lệ free-float",
            "FreeFloat",
            Scale::Percent,
            Some("%"),
            (0.0, 100.0),
        ),
        flag(
            G,
            co_tuc,
            "chi_tra_co_tuc_deu",
            "Chi trả cổ tức đều 3 năm",
            "HasSteadyDividend",
        ),
        flag(
            G,
            quy_mo,
            "thuoc_vn30",
            "Thuộc rổ VN30",
            "IsVN30",
        ),
        flag(
            G,
            thanh_khoan,
            "duoc_giao_dich_ky_quy",
            "Được giao dịch ký quỹ",
            "IsMarginable",
        ),
    ]
}
