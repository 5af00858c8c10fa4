//! Fixed vocabularies used by companies, orders and payments.
//!
//! Every choice is stored in the database and sent over the wire as its
//! upper-case key (`FLAT_BED`, `DANGEROUS_CATEGORY_ADR3`, ...).

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error for a value outside of a vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{value}` is not a valid choice")]
pub struct InvalidChoice {
    pub value: String,
}

/// Declares a string-keyed choice enum.
///
/// Each variant lists its wire key followed by optional legacy aliases that
/// are still accepted on input.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $variant:ident => $key:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $key ),+
                }
            }
        }

        impl FromStr for $name {
            type Err = InvalidChoice;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $key $(| $alias)* => Ok($name::$variant), )+
                    other => Err(InvalidChoice { value: other.to_string() }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = String::deserialize(deserializer)?;
                value.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

choice_enum! {
    /// Role a company plays in a shipment.
    pub enum PartyType {
        Shipper => "SHIPPER",
        Forwarder => "FORWARDER",
        Carrier => "CARRIER" | "CAREER",
    }
}

impl PartyType {
    /// Forwarders and carriers get paid, so they must register an IBAN.
    pub fn requires_iban(self) -> bool {
        matches!(self, PartyType::Forwarder | PartyType::Carrier)
    }
}

choice_enum! {
    pub enum Currency {
        Amd => "AMD",
        Aud => "AUD",
        Azn => "AZN",
        Cad => "CAD",
        Chf => "CHF",
        Cny => "CNY",
        Eur => "EUR",
        Gbp => "GBP",
        Gel => "GEL",
        Jpy => "JPY",
        Nzd => "NZD",
        Sek => "SEK",
        Usd => "USD",
    }
}

choice_enum! {
    pub enum PaymentType {
        InternationalSeaShipping => "INTERNATIONAL_SEA_SHIPPING" | "INTERNATION_SEA_SHIPPING",
    }
}

choice_enum! {
    pub enum TransportationType {
        Tent => "TENT",
        FlatBed => "FLAT_BED",
        Reefer => "REEFER",
    }
}

choice_enum! {
    /// How a tent trailer is loaded.
    pub enum LoadingType {
        RearLoad => "REAR_LOAD",
        TopLoad => "TOP_LOAD",
        SideLoad => "SIDE_LOAD",
        FreeLoad => "FREE_LOAD",
    }
}

choice_enum! {
    pub enum OrderStatus {
        InProgress => "IN_PROGRESS",
        Finished => "FINISHED",
    }
}

choice_enum! {
    pub enum CargoCategory {
        Standard => "STANDARD",
        NeedsARefrigeratedContainer => "NEEDS_A_REFRIGERATED_CONTAINER",
        Oversize => "OVERSIZE",
        SpecialEquipmentAndConstructions => "SPECIAL_EQUIPMENT_AND_CONSTRUCTIONS",
        DangerousCategoryAdr1 => "DANGEROUS_CATEGORY_ADR1",
        DangerousCategoryAdr2 => "DANGEROUS_CATEGORY_ADR2",
        DangerousCategoryAdr3 => "DANGEROUS_CATEGORY_ADR3",
        DangerousCategoryAdr4 => "DANGEROUS_CATEGORY_ADR4",
        DangerousCategoryAdr5 => "DANGEROUS_CATEGORY_ADR5",
        DangerousCategoryAdr6 => "DANGEROUS_CATEGORY_ADR6",
        DangerousCategoryAdr7 => "DANGEROUS_CATEGORY_ADR7",
        DangerousCategoryAdr8 => "DANGEROUS_CATEGORY_ADR8",
        DangerousCategoryAdr9 => "DANGEROUS_CATEGORY_ADR9",
    }
}

choice_enum! {
    pub enum CargoType {
        FurnitureAndAccessories => "FURNITURE_AND_ACCESSORIES",
        BathroomEquipmentAndAccessories => "BATHROOM_EQUIPMENT_AND_ACCESSORIES",
        VehicleLightSystems => "VEHICLE_LIGHT_SYSTEMS",
        AutoFluids => "AUTO_FLUIDS",
        AutoSpareParts => "AUTO_SPARE_PARTS",
        AutoParts => "AUTO_PARTS",
        AlcoholicBeverages => "ALCOHOLIC_BEVERAGES",
        NonAlcoholicBeverages => "NON_ALCOHOLIC_BEVERAGES",
        NonAlcoholicBeveragesJuicesCompotes => "NON_ALCOHOLIC_BEVERAGES_JUICES_COMPOTES",
        MatchesAndCommonHouseholdItems => "MATCHES_AND_COMMON_HOUSEHOLD_ITEMS",
        AudioSystems => "AUDIO_SYSTEMS",
        ChildrenNutrition => "CHILDREN_NUTRITION",
        ChildrenHygiene => "CHILDREN_HYGIENE",
        PrintingMaterials => "PRINTING_MATERIALS",
        Vegetables => "VEGETABLES",
        Cereal => "CEREAL",
        HvacSupplies => "HVAC_SUPPLIES",
        OutdoorFurniture => "OUTDOOR_FURNITURE",
        LandscapeLighting => "LANDSCAPE_LIGHTING",
        LandscapeInventory => "LANDSCAPE_INVENTORY",
        ElectricalWiring => "ELECTRICAL_WIRING",
        Labels => "LABELS",
        VitaminsAndSupplements => "VITAMINS_AND_SUPPLEMENTS",
        GeneralProductionSupplies => "GENERAL_PRODUCTION_SUPPLIES",
        PersonalCareProducts => "PERSONAL_CARE_PRODUCTS",
        Fish => "FISH",
        IndustrialLightingSystems => "INDUSTRIAL_LIGHTING_SYSTEMS",
        IndustrialKitchenEquipments => "INDUSTRIAL_KITCHEN_EQUIPMENTS",
        Butter => "BUTTER",
        CeramicTilesAndMaterials => "CERAMIC_TILES_AND_MATERIALS",
        Eggs => "EGGS",
        ComputerEquipment => "COMPUTER_EQUIPMENT",
        ComputerPeripheralsAndAccessories => "COMPUTER_PERIPHERALS_AND_ACCESSORIES",
        CannedFoods => "CANNED_FOODS",
        Beer => "BEER",
        RecyclePaper => "RECYCLE_PAPER",
        Grain => "GRAIN",
        Medicine => "MEDICINE",
        MetalBottles => "METAL_BOTTLES",
        MetalProductionMaterials => "METAL_PRODUCTION_MATERIALS",
        GlassBottles => "GLASS_BOTTLES",
        MobilePhones => "MOBILE_PHONES",
        MobilePhonesAccessories => "MOBILE_PHONES_ACCESSORIES",
        MotorcycleParts => "MOTORCYCLE_PARTS",
        Plants => "PLANTS",
        PlantsCare => "PLANTS_CARE",
        PlasticBottles => "PLASTIC_BOTTLES",
        ChildrenInventory => "CHILDREN_INVENTORY",
        Tires => "TIRES",
        ExercisingAccessories => "EXERCISING_ACCESSORIES",
        Toys => "TOYS",
        Stationery => "STATIONERY",
        CookingOil => "COOKING_OIL",
        FoodProducts => "FOOD_PRODUCTS",
        FoodProductsSweets => "FOOD_PRODUCTS_SWEETS",
        FoodManufacturingMaterials => "FOOD_MANUFACTURING_MATERIALS",
        MedicalSuppliesAndMaterials => "MEDICAL_SUPPLIES_AND_MATERIALS",
        MedicalEquipment => "MEDICAL_EQUIPMENT",
        KitchenAppliances => "KITCHEN_APPLIANCES",
        ConstructionToolsAndEquipment => "CONSTRUCTION_TOOLS_AND_EQUIPMENT",
        ConstructionSupplies => "CONSTRUCTION_SUPPLIES",
        ConstructionConsumables => "CONSTRUCTION_CONSUMABLES",
        OfficeEquipment => "OFFICE_EQUIPMENT",
        HouseholdLightingSystems => "HOUSEHOLD_LIGHTING_SYSTEMS",
        HouseholdMedicalEquipment => "HOUSEHOLD_MEDICAL_EQUIPMENT",
        HouseholdAppliances => "HOUSEHOLD_APPLIANCES",
        HouseholdHygiene => "HOUSEHOLD_HYGIENE",
        DrawingTools => "DRAWING_TOOLS",
        SportsAccessories => "SPORTS_ACCESSORIES",
        Perfume => "PERFUME",
        OtherFoodMaterials => "OTHER_FOOD_MATERIALS",
        OtherPaperProducts => "OTHER_PAPER_PRODUCTS",
        Clothes => "CLOTHES",
        Entertainment => "ENTERTAINMENT",
        GymEquipment => "GYM_EQUIPMENT",
        Shoes => "SHOES",
        PhotographyEquipments => "PHOTOGRAPHY_EQUIPMENTS",
        Fabrics => "FABRICS",
        Wine => "WINE",
        Coffee => "COFFEE",
        Tea => "TEA",
        PetAccessories => "PET_ACCESSORIES",
        PetMedicines => "PET_MEDICINES",
        PetCare => "PET_CARE",
        PetFood => "PET_FOOD",
        Fruit => "FRUIT",
        WoodManufactureMaterials => "WOOD_MANUFACTURE_MATERIALS",
        MeatProducts => "MEAT_PRODUCTS",
        Scrap => "SCRAP",
        Other => "OTHER",
    }
}

/// Coldest and warmest reefer set points, in degrees Celsius.
pub const REEFER_MIN_DEGREES: i8 = -25;
pub const REEFER_MAX_DEGREES: i8 = 25;

/// Container or trailer body requested for an order.
///
/// Tent and flat-bed bodies are fixed keys. Reefer bodies are either
/// `ISOTHERM` or a temperature set point such as `MINUS_EIGHTEEN_DEGREES`,
/// `ONE_DEGREE` or `TWENTYFIVE_DEGREES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerType {
    Standard,
    Mega,
    CarTrain,
    DryContainer,
    ReeferContainerWithGenset,
    ReeferContainerWithoutGenset,
    Isotherm,
    /// Reefer set point, within `REEFER_MIN_DEGREES..=REEFER_MAX_DEGREES`.
    Temperature(i8),
}

const NUMBER_WORDS: [&str; 20] = [
    "ZERO", "ONE", "TWO", "THREE", "FOUR", "FIVE", "SIX", "SEVEN", "EIGHT", "NINE", "TEN",
    "ELEVEN", "TWELVE", "THIRTEEN", "FOURTEEN", "FIFTEEN", "SIXTEEN", "SEVENTEEN", "EIGHTEEN",
    "NINETEEN",
];

fn number_word(n: u8) -> String {
    match n {
        0..=19 => NUMBER_WORDS[n as usize].to_string(),
        20 => "TWENTY".to_string(),
        _ => format!("TWENTY{}", NUMBER_WORDS[(n - 20) as usize]),
    }
}

fn temperature_key(degrees: i8) -> String {
    let sign = if degrees < 0 { "MINUS_" } else { "" };
    let unit = if degrees == 1 { "DEGREE" } else { "DEGREES" };
    format!("{sign}{}_{unit}", number_word(degrees.unsigned_abs()))
}

impl ContainerType {
    pub fn key(self) -> String {
        match self {
            ContainerType::Standard => "STANDARD".to_string(),
            ContainerType::Mega => "MEGA".to_string(),
            ContainerType::CarTrain => "CAR_TRAIN".to_string(),
            ContainerType::DryContainer => "DRY_CONTAINER".to_string(),
            ContainerType::ReeferContainerWithGenset => "REEFER_CONTAINER_WITH_GENSET".to_string(),
            ContainerType::ReeferContainerWithoutGenset => {
                "REEFER_CONTAINER_WITHOUT_GENSET".to_string()
            }
            ContainerType::Isotherm => "ISOTHERM".to_string(),
            ContainerType::Temperature(degrees) => temperature_key(degrees),
        }
    }

    /// Whether this body can be used with the given transportation type.
    pub fn fits(self, transport: TransportationType) -> bool {
        match transport {
            TransportationType::Tent => matches!(
                self,
                ContainerType::Standard | ContainerType::Mega | ContainerType::CarTrain
            ),
            TransportationType::FlatBed => matches!(
                self,
                ContainerType::DryContainer
                    | ContainerType::ReeferContainerWithGenset
                    | ContainerType::ReeferContainerWithoutGenset
            ),
            TransportationType::Reefer => matches!(
                self,
                ContainerType::Isotherm | ContainerType::Temperature(_)
            ),
        }
    }
}

impl FromStr for ContainerType {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fixed = match s {
            "STANDARD" => Some(ContainerType::Standard),
            "MEGA" => Some(ContainerType::Mega),
            "CAR_TRAIN" => Some(ContainerType::CarTrain),
            "DRY_CONTAINER" => Some(ContainerType::DryContainer),
            "REEFER_CONTAINER_WITH_GENSET" => Some(ContainerType::ReeferContainerWithGenset),
            "REEFER_CONTAINER_WITHOUT_GENSET" => Some(ContainerType::ReeferContainerWithoutGenset),
            "ISOTHERM" => Some(ContainerType::Isotherm),
            _ => None,
        };

        fixed
            .or_else(|| {
                (REEFER_MIN_DEGREES..=REEFER_MAX_DEGREES)
                    .find(|&degrees| temperature_key(degrees) == s)
                    .map(ContainerType::Temperature)
            })
            .ok_or_else(|| InvalidChoice {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}
