use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// Country, province and base price of each growing region.
const REGIONS: &[(&str, &str, f64)] = &[
    ("France", "Burgundy", 45.0),
    ("France", "Bordeaux", 40.0),
    ("Italy", "Piedmont", 42.0),
    ("Italy", "Tuscany", 35.0),
    ("Spain", "Northern Spain", 22.0),
    ("US", "California", 38.0),
    ("US", "Oregon", 33.0),
    ("Argentina", "Mendoza Province", 20.0),
    ("Chile", "Colchagua Valley", 18.0),
    ("Portugal", "Douro", 24.0),
    ("Germany", "Mosel", 28.0),
    ("Australia", "South Australia", 26.0),
];

/// Varieties grown in each of [`REGIONS`], same order.
const REGION_VARIETIES: &[&[&str]] = &[
    &["Pinot Noir", "Chardonnay", "Gamay"],
    &["Bordeaux-style Red Blend", "Merlot", "Sauvignon Blanc"],
    &["Nebbiolo", "Barbera"],
    &["Sangiovese", "Red Blend"],
    &["Tempranillo", "Garnacha"],
    &["Cabernet Sauvignon", "Pinot Noir", "Chardonnay"],
    &["Pinot Noir", "Pinot Gris"],
    &["Malbec", "Cabernet Sauvignon"],
    &["Carmenère", "Cabernet Sauvignon"],
    &["Portuguese Red", "Touriga Nacional"],
    &["Riesling"],
    &["Shiraz", "Cabernet Sauvignon"],
];

const WINERIES: &[&str] = &[
    "Domaine des Croix",
    "Château Lafleur",
    "Bodega Alta",
    "Cantina del Sole",
    "Quinta do Vale",
    "Weingut Berg",
    "Hill Estate",
    "Viña Andes",
    "Maison Roche",
];
const DESIGNATIONS: &[&str] = &[
    "Reserve",
    "Vieilles Vignes",
    "Estate",
    "Gran Reserva",
    "Cuvée Spéciale",
];
const TASTERS: &[(&str, &str)] = &[
    ("Roger Voss", "@vossroger"),
    ("Kerin O'Keefe", "@kerinokeefe"),
    ("Michael Schachner", "@wineschach"),
    ("Paul Gregutt", "@paulgwine"),
];

/// Column builders for one output file.
#[derive(Default)]
struct Columns {
    country: Vec<Option<String>>,
    description: Vec<Option<String>>,
    designation: Vec<Option<String>>,
    points: Vec<i64>,
    price: Vec<Option<f64>>,
    province: Vec<Option<String>>,
    region_1: Vec<Option<String>>,
    region_2: Vec<Option<String>>,
    taster_name: Vec<Option<String>>,
    taster_twitter_handle: Vec<Option<String>>,
    title: Vec<String>,
    variety: Vec<Option<String>>,
    winery: Vec<Option<String>>,
}

impl Columns {
    fn push_random(&mut self, rng: &mut SimpleRng) {
        let region = rng.below(REGIONS.len());
        let (country, province, base_price) = REGIONS[region];
        let variety = *rng.pick(REGION_VARIETIES[region]);
        let winery = *rng.pick(WINERIES);
        let designation = rng.chance(0.6).then(|| *rng.pick(DESIGNATIONS));
        let (taster, handle) = *rng.pick(TASTERS);
        // 1995..=2020; some non-vintage bottles carry no year at all
        let year = rng.chance(0.9).then(|| 1995 + rng.below(26));

        let points = rng.gauss(88.0, 3.0).round().clamp(80.0, 100.0) as i64;
        let price = (base_price * (1.0 + 0.12 * (points as f64 - 88.0)) + rng.gauss(0.0, 6.0))
            .max(4.0)
            .round();

        let mut title = winery.to_string();
        if let Some(y) = year {
            title.push_str(&format!(" {y}"));
        }
        if let Some(d) = designation {
            title.push_str(&format!(" {d}"));
        }
        title.push_str(&format!(" {variety} ({province})"));

        let description = format!("A {variety} from {province}.");
        let region_1 = rng.chance(0.8).then(|| format!("{province} Hills"));

        self.country.push(Some(country.to_string()));
        self.description.push(Some(description));
        self.designation.push(designation.map(str::to_string));
        self.points.push(points);
        self.price.push(rng.chance(0.95).then_some(price));
        self.province.push(Some(province.to_string()));
        self.region_1.push(region_1);
        self.region_2.push(None);
        self.taster_name.push(Some(taster.to_string()));
        self.taster_twitter_handle.push(Some(handle.to_string()));
        self.title.push(title);
        self.variety.push(Some(variety.to_string()));
        self.winery.push(Some(winery.to_string()));
    }

    fn write(self, path: &str) {
        fn text(values: Vec<Option<String>>) -> ArrayRef {
            Arc::new(StringArray::from(values))
        }

        let columns: Vec<(&str, ArrayRef)> = vec![
            ("country", text(self.country)),
            ("description", text(self.description)),
            ("designation", text(self.designation)),
            ("points", Arc::new(Int64Array::from(self.points))),
            ("price", Arc::new(Float64Array::from(self.price))),
            ("province", text(self.province)),
            ("region_1", text(self.region_1)),
            ("region_2", text(self.region_2)),
            ("taster_name", text(self.taster_name)),
            ("taster_twitter_handle", text(self.taster_twitter_handle)),
            ("title", Arc::new(StringArray::from(self.title))),
            ("variety", text(self.variety)),
            ("winery", text(self.winery)),
        ];

        let schema = Arc::new(Schema::new(
            columns
                .iter()
                .map(|(name, arr)| {
                    let nullable = *arr.data_type() != DataType::Int64;
                    Field::new(*name, arr.data_type().clone(), nullable)
                })
                .collect::<Vec<_>>(),
        ));
        let n_rows = columns[0].1.len();
        let batch = RecordBatch::try_new(
            schema.clone(),
            columns.into_iter().map(|(_, arr)| arr).collect(),
        )
        .expect("Failed to create RecordBatch");

        let file = std::fs::File::create(path).expect("Failed to create output file");
        let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
        writer.write(&batch).expect("Failed to write batch");
        writer.close().expect("Failed to close writer");

        println!("Wrote {n_rows} wines to {path}");
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let mut catalog = Columns::default();
    for _ in 0..5000 {
        catalog.push_random(&mut rng);
    }
    catalog.write("wine_dataset.parquet");

    let mut clients = Columns::default();
    for _ in 0..40 {
        clients.push_random(&mut rng);
    }
    clients.write("client_wine.parquet");
}
