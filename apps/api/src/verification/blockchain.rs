//! Blockchain verifier: scores a wallet's on-chain footprint.
//!
//! Live data comes from Covalent; `FixtureChainData` stands in when no API key is
//! configured so the pipeline stays usable in development.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::provider_client::{ProviderClient, ProviderError};
use crate::verification::bounded;
use crate::verification::models::{BlockchainVerification, NftInfo, TokenInfo};

pub const BLOCKCHAIN_SCORE_CAP: u32 = 600;
const TRANSACTION_POINTS_CEILING: u64 = 100;

/// Skills that on-chain activity can corroborate.
pub const BLOCKCHAIN_SKILLS: &[&str] = &["blockchain", "web3", "ethereum", "solidity", "defi", "nft"];

const COVALENT_API_BASE: &str = "https://api.covalenthq.com/v1";

/// Fungible tokens and NFTs held by a wallet, fetched together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Holdings {
    pub tokens: Vec<TokenInfo>,
    pub nfts: Vec<NftInfo>,
}

#[async_trait]
pub trait ChainDataSource: Send + Sync {
    async fn transaction_count(&self, address: &str) -> Result<u64, ProviderError>;
    async fn holdings(&self, address: &str) -> Result<Holdings, ProviderError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Covalent client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CovalentEnvelope<T> {
    data: CovalentData<T>,
}

#[derive(Debug, Deserialize)]
struct CovalentData<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct TransactionSummary {
    #[serde(default)]
    total_count: u64,
}

#[derive(Debug, Deserialize)]
struct BalanceItem {
    contract_name: Option<String>,
    contract_ticker_symbol: Option<String>,
    #[serde(default)]
    contract_address: String,
    balance: Option<String>,
    #[serde(rename = "type")]
    item_type: Option<String>,
    #[serde(default)]
    nft_data: Option<Vec<NftData>>,
}

#[derive(Debug, Deserialize)]
struct NftData {
    token_id: Option<String>,
    external_data: Option<NftExternalData>,
}

#[derive(Debug, Deserialize)]
struct NftExternalData {
    name: Option<String>,
}

impl BalanceItem {
    fn is_nft(&self) -> bool {
        self.item_type.as_deref() == Some("nft")
    }
}

pub struct CovalentClient {
    http: ProviderClient,
    api_key: String,
    chain_id: String,
}

impl CovalentClient {
    pub fn new(http: ProviderClient, api_key: String, chain_id: String) -> Self {
        Self {
            http,
            api_key,
            chain_id,
        }
    }

    fn url(&self, address: &str, endpoint: &str, extra: &str) -> String {
        format!(
            "{COVALENT_API_BASE}/{}/address/{address}/{endpoint}/?key={}{extra}",
            self.chain_id, self.api_key
        )
    }
}

/// Splits one `balances_v2` page into fungible tokens and flattened NFT tokens.
fn split_holdings(items: Vec<BalanceItem>) -> Holdings {
    let mut holdings = Holdings::default();
    for item in items {
        if !item.is_nft() {
            holdings.tokens.push(TokenInfo {
                name: item.contract_name.unwrap_or_default(),
                symbol: item.contract_ticker_symbol.unwrap_or_default(),
                balance: item.balance.unwrap_or_else(|| "0".to_string()),
                contract_address: item.contract_address,
            });
            continue;
        }
        let collection = item.contract_name.unwrap_or_default();
        for token in item.nft_data.unwrap_or_default() {
            let token_id = token.token_id.unwrap_or_default();
            let name = token
                .external_data
                .and_then(|d| d.name)
                .unwrap_or_else(|| format!("{collection} #{token_id}"));
            holdings.nfts.push(NftInfo {
                name,
                collection: collection.clone(),
                token_id,
                contract_address: item.contract_address.clone(),
            });
        }
    }
    holdings
}

#[async_trait]
impl ChainDataSource for CovalentClient {
    async fn transaction_count(&self, address: &str) -> Result<u64, ProviderError> {
        let url = self.url(address, "transactions_summary", "");
        let envelope: CovalentEnvelope<TransactionSummary> = self.http.get_json(&url, &[]).await?;
        Ok(envelope
            .data
            .items
            .first()
            .map(|s| s.total_count)
            .unwrap_or(0))
    }

    async fn holdings(&self, address: &str) -> Result<Holdings, ProviderError> {
        let url = self.url(address, "balances_v2", "&nft=true");
        let envelope: CovalentEnvelope<BalanceItem> = self.http.get_json(&url, &[]).await?;
        Ok(split_holdings(envelope.data.items))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fixture source (no API key configured)
// ────────────────────────────────────────────────────────────────────────────

pub const FIXTURE_TRANSACTION_COUNT: u64 = 75;

/// Deterministic canned wallet: a fixed transaction count, three tokens and two NFTs.
pub struct FixtureChainData {
    pub transaction_count: u64,
}

impl Default for FixtureChainData {
    fn default() -> Self {
        Self {
            transaction_count: FIXTURE_TRANSACTION_COUNT,
        }
    }
}

#[async_trait]
impl ChainDataSource for FixtureChainData {
    async fn transaction_count(&self, _address: &str) -> Result<u64, ProviderError> {
        Ok(self.transaction_count)
    }

    async fn holdings(&self, _address: &str) -> Result<Holdings, ProviderError> {
        let token = |name: &str, symbol: &str, balance: &str, contract: &str| TokenInfo {
            name: name.to_string(),
            symbol: symbol.to_string(),
            balance: balance.to_string(),
            contract_address: contract.to_string(),
        };
        let tokens = vec![
            token("Ethereum", "ETH", "0.5", ""),
            token(
                "USD Coin",
                "USDC",
                "100.0",
                "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48",
            ),
            token(
                "Chainlink",
                "LINK",
                "50.0",
                "0x514910771af9ca656af840dff83e8264ecf986ca",
            ),
        ];
        let nfts = vec![
            NftInfo {
                name: "Bored Ape #123".to_string(),
                collection: "Bored Ape Yacht Club".to_string(),
                token_id: "123".to_string(),
                contract_address: "0xbc4ca0eda7647a8ab7c2061c2e118a18a936f13d".to_string(),
            },
            NftInfo {
                name: "CryptoPunk #456".to_string(),
                collection: "CryptoPunks".to_string(),
                token_id: "456".to_string(),
                contract_address: "0xb47e3cd837ddf8e4c57f05d70ab865de6e193bbb".to_string(),
            },
        ];
        Ok(Holdings { tokens, nfts })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Verification
// ────────────────────────────────────────────────────────────────────────────

pub async fn verify_blockchain(
    source: &dyn ChainDataSource,
    wallet_address: &str,
    skills: &[String],
    timeout: Duration,
) -> BlockchainVerification {
    let fetch = async {
        tokio::try_join!(
            source.transaction_count(wallet_address),
            source.holdings(wallet_address),
        )
    };
    let Some((transactions, Holdings { tokens, nfts })) = bounded(timeout, "Blockchain", fetch).await else {
        return BlockchainVerification::default();
    };

    let defi_protocols = defi_protocols_for_activity(transactions);
    let score = blockchain_score(transactions, tokens.len(), nfts.len(), defi_protocols.len(), skills);

    info!(
        "Blockchain verification for {wallet_address}: {transactions} txs, {} tokens, {} NFTs, score {score}",
        tokens.len(),
        nfts.len()
    );

    BlockchainVerification {
        transactions,
        tokens_held: tokens,
        nfts_owned: nfts,
        defi_protocols,
        score,
    }
}

/// Activity-tier heuristic for protocol usage. Replace with a classifier over the
/// wallet's actual contract interactions once transaction decoding is available.
pub fn defi_protocols_for_activity(transactions: u64) -> Vec<String> {
    let protocols: &[&str] = if transactions > 100 {
        &["Uniswap", "Compound", "Aave"]
    } else if transactions > 50 {
        &["Uniswap", "SushiSwap"]
    } else {
        &["Uniswap"]
    };
    protocols.iter().map(|p| p.to_string()).collect()
}

pub fn is_blockchain_skill(skill: &str) -> bool {
    BLOCKCHAIN_SKILLS.contains(&skill.to_lowercase().as_str())
}

/// `2×min(txs,100) + 20×tokens + 30×NFTs + 40×protocols + 50×blockchain skills`, capped at 600.
pub fn blockchain_score(
    transactions: u64,
    token_count: usize,
    nft_count: usize,
    defi_count: usize,
    skills: &[String],
) -> u32 {
    let skill_matches = skills.iter().filter(|s| is_blockchain_skill(s)).count();
    let raw = 2 * transactions.min(TRANSACTION_POINTS_CEILING)
        + 20 * token_count as u64
        + 30 * nft_count as u64
        + 40 * defi_count as u64
        + 50 * skill_matches as u64;
    raw.min(u64::from(BLOCKCHAIN_SCORE_CAP)) as u32
}
